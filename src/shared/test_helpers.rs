#[cfg(test)]
use crate::features::auth::model::AuthenticatedUser;

#[cfg(test)]
use uuid::Uuid;

#[cfg(test)]
pub const TEST_USER_ID: Uuid = Uuid::from_u128(0x0192_0000_0000_7000_8000_0000_0000_0001);

#[cfg(test)]
pub fn create_test_user() -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: TEST_USER_ID,
        sub: TEST_USER_ID.to_string(),
    }
}
