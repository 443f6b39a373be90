//! Directory-backed repository: one JSON file per token identity.

use custody_token::Token;
use custody_types::TokenId;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::repository::Repository;

#[derive(Debug, Clone)]
pub struct FsRepository {
    dir: PathBuf,
}

impl FsRepository {
    /// Open `dir`, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &TokenId) -> PathBuf {
        self.dir.join(format!("{}.json", id.to_key_string()))
    }
}

impl Repository for FsRepository {
    fn find(&self, id: &TokenId) -> Result<Option<Token>, StoreError> {
        let path = self.path_for(id);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let token: Token = serde_json::from_str(&json)?;
        if token.id() != *id {
            return Err(StoreError::Backend(format!(
                "{} holds token {}, expected {id}",
                path.display(),
                token.id()
            )));
        }
        Ok(Some(token))
    }

    fn put(&self, token: &Token) -> Result<(), StoreError> {
        let path = self.path_for(&token.id());
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(token)?)?;
        fs::rename(&tmp, &path)?;
        tracing::debug!(token = %token.id(), path = %path.display(), "stored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use custody_crypto::{keypair_from_seed, Ed25519Blake2b, ED25519_BLAKE2B};
    use custody_types::{Address, AddressType, Target, Timestamp, Value};

    fn token() -> Token {
        let kp = keypair_from_seed(&[4u8; 32]);
        let header = custody_token::Header::builder()
            .algorithm(ED25519_BLAKE2B)
            .currency("Gradido")
            .amount(Value::UNIT)
            .timestamp(Timestamp::from_secs(77))
            .location(Default::default())
            .target(Target::PERSON_INCOME)
            .recipient(Address::new(AddressType::NaturalPersonAdult, kp.public.clone()))
            .sign(&Ed25519Blake2b, &kp.private)
            .unwrap();
        Token::new(header)
    }

    #[test]
    fn put_then_find() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FsRepository::open(dir.path().join("tokens")).unwrap();
        let t = token();
        assert_eq!(repo.find(&t.id()).unwrap(), None);
        repo.put(&t).unwrap();
        assert_eq!(repo.find(&t.id()).unwrap(), Some(t));
    }

    #[test]
    fn misfiled_token_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FsRepository::open(dir.path()).unwrap();
        let t = token();
        let mut other = t.id();
        other.timestamp = other.timestamp.next();
        fs::write(repo.path_for(&other), serde_json::to_vec(&t).unwrap()).unwrap();
        assert!(matches!(repo.find(&other), Err(StoreError::Backend(_))));
    }

    #[test]
    fn garbage_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FsRepository::open(dir.path()).unwrap();
        let id = token().id();
        fs::write(repo.path_for(&id), b"{not json").unwrap();
        assert!(matches!(repo.find(&id), Err(StoreError::Serialization(_))));
    }
}
