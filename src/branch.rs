use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::PricingOverrides;
use crate::errors::{CalcError, Result};
use crate::types::RefundPolicyMode;

/// locker holding the master key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockerCredentials {
    pub locker_number: String,
    pub password: String,
}

/// one franchise location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchProfile {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    /// phone number or messenger channel
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub master_key_locker: Option<LockerCredentials>,
    #[serde(default)]
    pub pricing: PricingOverrides,
    #[serde(default)]
    pub refund_policy: Option<RefundPolicyMode>,
}

/// read-only lookup of branch reference data, may be stale
pub trait BranchDirectory {
    /// exact branch name match
    fn find(&self, name: &str) -> Option<BranchProfile>;

    /// branches whose name or address contains the query
    fn search(&self, query: &str) -> Vec<BranchProfile>;

    /// like `find` but an unknown branch is an error
    fn require(&self, name: &str) -> Result<BranchProfile> {
        self.find(name).ok_or_else(|| CalcError::BranchNotFound {
            name: name.to_string(),
        })
    }
}

/// directory loaded from a json export of the reference sheet
#[derive(Debug, Clone, Default)]
pub struct InMemoryBranchDirectory {
    branches: Vec<BranchProfile>,
}

impl InMemoryBranchDirectory {
    pub fn new(branches: Vec<BranchProfile>) -> Self {
        Self { branches }
    }

    /// parse a json array of branch profiles
    pub fn from_json(json: &str) -> Result<Self> {
        let branches: Vec<BranchProfile> = serde_json::from_str(json)?;
        if let Some(blank) = branches.iter().find(|b| b.name.trim().is_empty()) {
            return Err(CalcError::validation(format!(
                "branch with empty name (address: {:?})",
                blank.address
            )));
        }
        debug!(count = branches.len(), "branch directory loaded");
        Ok(Self::new(branches))
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }
}

impl BranchDirectory for InMemoryBranchDirectory {
    fn find(&self, name: &str) -> Option<BranchProfile> {
        let name = name.trim();
        self.branches.iter().find(|b| b.name == name).cloned()
    }

    fn search(&self, query: &str) -> Vec<BranchProfile> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        self.branches
            .iter()
            .filter(|b| {
                b.name.contains(query)
                    || b.address.as_deref().is_some_and(|a| a.contains(query))
            })
            .cloned()
            .collect()
    }
}
