//! Prescribed creation amounts.

use custody_types::{AddressType, Target, TargetType, Value};
use serde::{Deserialize, Serialize};

/// Amount a natural person may create per target kind.
///
/// Children receive `child_share_percent` of the adult amount for person
/// income. Institutions and pseudonyms cannot create value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreationSchedule {
    pub person_income: Value,
    pub child_share_percent: u8,
    pub community_tax: Value,
    pub sustainability: Value,
    /// When false only adults may create.
    pub children_create: bool,
}

impl CreationSchedule {
    pub fn amount_for(&self, target: &Target, creator: &AddressType) -> Option<Value> {
        let child = match creator {
            AddressType::NaturalPersonAdult => false,
            AddressType::NaturalPersonChild if self.children_create => true,
            _ => return None,
        };
        let amount = match target.kind {
            TargetType::PersonIncome if child => {
                Value::from_raw(self.person_income.raw() * u128::from(self.child_share_percent) / 100)
            }
            TargetType::PersonIncome => self.person_income,
            TargetType::CommunityTax => self.community_tax,
            TargetType::Sustainability => self.sustainability,
        };
        (!amount.is_zero()).then_some(amount)
    }
}
