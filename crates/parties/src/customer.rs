use serde::{Deserialize, Serialize};
use std::sync::Arc;

use orderflow_core::CustomerId;

/// Notification tier of a customer.
///
/// The stored tag is open-ended; only `regular`, `premium` and `vip` are
/// recognized and everything else (including a missing tag) is `Regular`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerTier {
    #[default]
    Regular,
    Premium,
    Vip,
}

impl CustomerTier {
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("premium") => CustomerTier::Premium,
            Some("vip") => CustomerTier::Vip,
            _ => CustomerTier::Regular,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerTier::Regular => "regular",
            CustomerTier::Premium => "premium",
            CustomerTier::Vip => "vip",
        }
    }
}

impl core::fmt::Display for CustomerTier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Customer owning orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    /// Raw tier tag as stored; see [`Customer::tier`] for the resolved value.
    #[serde(rename = "type")]
    pub tier_tag: Option<String>,
}

impl Customer {
    pub fn new(id: CustomerId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            tier_tag: None,
        }
    }

    pub fn with_tier_tag(mut self, tag: impl Into<String>) -> Self {
        self.tier_tag = Some(tag.into());
        self
    }

    pub fn tier(&self) -> CustomerTier {
        CustomerTier::from_tag(self.tier_tag.as_deref())
    }
}

/// Read access to customers (storage is external).
pub trait CustomerDirectory: Send + Sync {
    fn find(&self, id: CustomerId) -> Option<Customer>;
}

impl<D> CustomerDirectory for Arc<D>
where
    D: CustomerDirectory + ?Sized,
{
    fn find(&self, id: CustomerId) -> Option<Customer> {
        (**self).find(id)
    }
}
