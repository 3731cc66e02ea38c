use payment_sqlx::UserRole;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ViewOwnTransactions,
    ViewAllTransactions,
    ViewAnalytics,
    ExportReports,
    UpdateTransactionStatus,
    ManageUsers,
    ManageSettings,
}

const USER_PERMISSIONS: &[Permission] = &[Permission::ViewOwnTransactions];

const MERCHANT_PERMISSIONS: &[Permission] = &[
    Permission::ViewOwnTransactions,
    Permission::ViewAnalytics,
    Permission::ExportReports,
];

const ADMIN_PERMISSIONS: &[Permission] = &[
    Permission::ViewOwnTransactions,
    Permission::ViewAllTransactions,
    Permission::ViewAnalytics,
    Permission::ExportReports,
    Permission::UpdateTransactionStatus,
    Permission::ManageUsers,
    Permission::ManageSettings,
];

pub fn permissions(role: UserRole) -> &'static [Permission] {
    match role {
        UserRole::User => USER_PERMISSIONS,
        UserRole::Merchant => MERCHANT_PERMISSIONS,
        UserRole::Admin => ADMIN_PERMISSIONS,
    }
}

pub fn has_permission(role: UserRole, permission: Permission) -> bool {
    permissions(role).contains(&permission)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_only_sees_own_transactions() {
        assert_eq!(permissions(UserRole::User), &[Permission::ViewOwnTransactions]);
        assert!(!has_permission(UserRole::User, Permission::ViewAnalytics));
    }

    #[test]
    fn merchant_can_read_analytics_but_not_manage() {
        assert!(has_permission(UserRole::Merchant, Permission::ViewAnalytics));
        assert!(has_permission(UserRole::Merchant, Permission::ExportReports));
        assert!(!has_permission(UserRole::Merchant, Permission::ManageUsers));
    }

    #[test]
    fn admin_holds_every_permission() {
        for permission in ADMIN_PERMISSIONS {
            assert!(has_permission(UserRole::Admin, *permission));
        }
        assert!(has_permission(UserRole::Admin, Permission::UpdateTransactionStatus));
    }
}
