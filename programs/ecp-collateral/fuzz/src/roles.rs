//! Role registry: one immutable owner plus a mutable admin set

use std::collections::BTreeSet;

use crate::ledger::LedgerError;
use crate::store::AccountId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRegistry {
    owner: AccountId,
    admins: BTreeSet<AccountId>,
}

impl RoleRegistry {
    pub fn new(owner: AccountId) -> Self {
        Self {
            owner,
            admins: BTreeSet::new(),
        }
    }

    pub fn owner(&self) -> AccountId {
        self.owner
    }

    pub fn admins(&self) -> impl Iterator<Item = &AccountId> {
        self.admins.iter()
    }

    pub fn is_owner(&self, address: &AccountId) -> bool {
        *address == self.owner
    }

    /// The owner is implicitly an admin and never sits in the explicit set.
    pub fn is_admin(&self, address: &AccountId) -> bool {
        self.is_owner(address) || self.admins.contains(address)
    }

    pub fn require_owner(&self, caller: &AccountId) -> Result<(), LedgerError> {
        if self.is_owner(caller) {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized)
        }
    }

    pub fn require_admin(&self, caller: &AccountId) -> Result<(), LedgerError> {
        if self.is_admin(caller) {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized)
        }
    }

    /// Returns `true` if inserted, `false` if the address was already an admin.
    pub fn add_admin(&mut self, caller: &AccountId, address: AccountId) -> Result<bool, LedgerError> {
        self.require_owner(caller)?;
        self.check_assignable(&address)?;
        Ok(self.admins.insert(address))
    }

    /// Returns `true` if removed, `false` if the address was not an admin.
    pub fn remove_admin(
        &mut self,
        caller: &AccountId,
        address: AccountId,
    ) -> Result<bool, LedgerError> {
        self.require_owner(caller)?;
        self.check_assignable(&address)?;
        Ok(self.admins.remove(&address))
    }

    fn check_assignable(&self, address: &AccountId) -> Result<(), LedgerError> {
        if address.is_zero() || self.is_owner(address) {
            return Err(LedgerError::InvalidParameter);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: AccountId = AccountId::from_seed(0);
    const ADMIN: AccountId = AccountId::from_seed(1);
    const STRANGER: AccountId = AccountId::from_seed(9);

    #[test]
    fn test_owner_manages_admins() {
        let mut roles = RoleRegistry::new(OWNER);
        assert!(roles.is_admin(&OWNER));
        assert!(!roles.is_admin(&ADMIN));

        assert_eq!(roles.add_admin(&OWNER, ADMIN), Ok(true));
        assert!(roles.is_admin(&ADMIN));
        assert_eq!(roles.add_admin(&OWNER, ADMIN), Ok(false));

        assert_eq!(roles.remove_admin(&OWNER, ADMIN), Ok(true));
        assert!(!roles.is_admin(&ADMIN));
        assert_eq!(roles.remove_admin(&OWNER, ADMIN), Ok(false));
    }

    #[test]
    fn test_admins_cannot_manage_admins() {
        let mut roles = RoleRegistry::new(OWNER);
        roles.add_admin(&OWNER, ADMIN).unwrap();

        assert_eq!(roles.add_admin(&ADMIN, STRANGER), Err(LedgerError::Unauthorized));
        assert_eq!(roles.remove_admin(&STRANGER, ADMIN), Err(LedgerError::Unauthorized));
        assert!(roles.is_admin(&ADMIN));
        assert!(!roles.is_admin(&STRANGER));
    }

    #[test]
    fn test_owner_is_not_assignable() {
        let mut roles = RoleRegistry::new(OWNER);
        assert_eq!(roles.add_admin(&OWNER, OWNER), Err(LedgerError::InvalidParameter));
        assert_eq!(roles.remove_admin(&OWNER, OWNER), Err(LedgerError::InvalidParameter));
        assert_eq!(
            roles.add_admin(&OWNER, AccountId::default()),
            Err(LedgerError::InvalidParameter)
        );
        assert!(roles.is_admin(&OWNER));
        assert_eq!(roles.admins().count(), 0);
    }
}
