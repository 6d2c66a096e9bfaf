//! Interaction policy from the settings file.
//!
//! Gates only replies; reconciliation records every tracked-chat event
//! regardless of the policy.

use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AccessPolicy {
    /// When false everyone may interact (mute lists still apply).
    #[serde(default)]
    pub use_whitelist: bool,
    #[serde(default)]
    pub admins: Vec<i64>,
    #[serde(default)]
    pub whitelisted_users: Vec<i64>,
    #[serde(default)]
    pub whitelisted_chats: Vec<i64>,
    #[serde(default)]
    pub muted_users: Vec<i64>,
    #[serde(default)]
    pub muted_chats: Vec<i64>,
}

impl AccessPolicy {
    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admins.contains(&user_id)
    }

    /// Whether the bot may reply to this user in this chat.
    pub fn allows(&self, user_id: i64, chat_id: i64) -> bool {
        if self.muted_users.contains(&user_id) || self.muted_chats.contains(&chat_id) {
            return false;
        }
        if !self.use_whitelist {
            return true;
        }
        self.is_admin(user_id)
            || self.whitelisted_users.contains(&user_id)
            || self.whitelisted_chats.contains(&chat_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> AccessPolicy {
        AccessPolicy {
            use_whitelist: true,
            admins: vec![1],
            whitelisted_users: vec![2],
            whitelisted_chats: vec![-10],
            muted_users: vec![3],
            muted_chats: vec![-20],
        }
    }

    #[test]
    fn whitelist_members_and_admins_allowed() {
        let policy = policy();
        assert!(policy.allows(1, -99));
        assert!(policy.allows(2, -99));
        assert!(policy.allows(99, -10));
        assert!(!policy.allows(99, -99));
    }

    #[test]
    fn mute_wins_over_whitelist() {
        let mut policy = policy();
        policy.muted_users.push(1);
        assert!(!policy.allows(1, -10));
        assert!(!policy.allows(2, -20));
    }

    #[test]
    fn open_policy_still_respects_mutes() {
        let policy = AccessPolicy {
            muted_users: vec![3],
            muted_chats: vec![-20],
            ..Default::default()
        };
        assert!(policy.allows(99, -99));
        assert!(!policy.allows(3, -99));
        assert!(!policy.allows(99, -20));
    }
}
