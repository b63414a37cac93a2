//! Authorization rules shared by the user routes.

/// Who may modify whom, and who may see whose profile.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    admin_email: String,
}

impl AccessPolicy {
    pub fn new(admin_email: impl Into<String>) -> Self {
        Self {
            admin_email: admin_email.into(),
        }
    }

    pub fn is_admin(&self, email: &str) -> bool {
        email.eq_ignore_ascii_case(&self.admin_email)
    }

    /// Owner-or-admin rule for updating or deleting a user.
    pub fn can_modify_user(&self, actor_id: i64, actor_email: &str, target_id: i64) -> bool {
        actor_id == target_id || self.is_admin(actor_email)
    }

    /// A profile is visible to its owner and to accepted friends.
    pub fn can_view_profile(actor_id: i64, target_id: i64, are_friends: bool) -> bool {
        actor_id == target_id || are_friends
    }
}
