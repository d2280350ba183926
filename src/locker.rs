use serde::{Deserialize, Serialize};

use crate::branch::BranchProfile;
use crate::errors::{CalcError, Result};

/// where the shared master key is kept and how to open it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockerMasterKey {
    locker_number: String,
    password: String,
}

impl LockerMasterKey {
    pub fn new(locker_number: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        let locker_number = locker_number.into().trim().to_string();
        let password = password.into().trim().to_string();

        if locker_number.is_empty() {
            return Err(CalcError::MissingField {
                field: "locker_number",
            });
        }
        if password.is_empty() {
            return Err(CalcError::MissingField { field: "password" });
        }

        Ok(Self {
            locker_number,
            password,
        })
    }

    /// credentials registered for a branch
    pub fn for_branch(branch: &BranchProfile) -> Result<Self> {
        let credentials = branch.master_key_locker.as_ref().ok_or_else(|| {
            CalcError::validation(format!(
                "no master-key locker registered for branch '{}'",
                branch.name
            ))
        })?;
        Self::new(&credentials.locker_number, &credentials.password)
    }

    pub fn locker_number(&self) -> &str {
        &self.locker_number
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// customer message sent after the purchase is confirmed
    pub fn notice(&self) -> String {
        format!(
            "구매 확인 완료되어,\n\
             사물함 마스터키 안내드립니다.\n\
             \n\
             [ {number} ]번 사물함에 가셔서\n\
             비밀번호 [ {password} ]을(를) 눌러주시면,\n\
             내부에 마스터키가 들어 있습니다.\n\
             키는 사용 후에 제자리에 넣고 다시 [ {password} ] 입력하여 잠금 부탁드립니다.\n\
             \n\
             [마스터키 사용 방법]\n\
             마스터키를 잠겨있는 사물함의\n\
             키패드 중간에 보이는 '동그란 홈 부분'에 대시면 문이 열립니다.\n\
             \n\
             [사물함 비밀번호 설정 방법]\n\
             문을 닫고 원하는 비밀번호 4자리를 누르세요.\n\
             '설정했던 비밀번호 4자리'를 다시 누르면 문이 열립니다.",
            number = self.locker_number,
            password = self.password,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branch::LockerCredentials;
    use crate::config::PricingOverrides;

    fn branch(locker: Option<LockerCredentials>) -> BranchProfile {
        BranchProfile {
            name: "강남점".to_string(),
            address: None,
            contact: None,
            master_key_locker: locker,
            pricing: PricingOverrides::default(),
            refund_policy: None,
        }
    }

    #[test]
    fn test_notice_mentions_locker_and_password_twice() {
        let key = LockerMasterKey::new(" 101 ", "2580").unwrap();
        let notice = key.notice();

        assert!(notice.contains("[ 101 ]번 사물함에 가셔서"));
        assert_eq!(notice.matches("[ 2580 ]").count(), 2);
        assert!(notice.ends_with("다시 누르면 문이 열립니다."));
        assert!(!notice.contains('{'));
    }

    #[test]
    fn test_blank_values_rejected() {
        assert!(matches!(
            LockerMasterKey::new("  ", "2580"),
            Err(CalcError::MissingField { field: "locker_number" })
        ));
        assert!(matches!(
            LockerMasterKey::new("101", ""),
            Err(CalcError::MissingField { field: "password" })
        ));
    }

    #[test]
    fn test_from_branch_reference_data() {
        let key = LockerMasterKey::for_branch(&branch(Some(LockerCredentials {
            locker_number: "7".to_string(),
            password: "0000".to_string(),
        })))
        .unwrap();
        assert_eq!(key.locker_number(), "7");
        assert_eq!(key.password(), "0000");

        assert!(matches!(
            LockerMasterKey::for_branch(&branch(None)),
            Err(CalcError::Validation { .. })
        ));
    }
}
