//! Uniqueness and lookup tests for the `PostgreSQL` user store.

use super::helpers::{PostgresContext, postgres_context};
use eyre::{Result, bail, ensure};
use rstest::rstest;
use taskdesk::failure::FailureKind;
use taskdesk::user::domain::{RoleFlags, Username};
use taskdesk::user::ports::{UserRepository, UserRepositoryError};
use taskdesk::user::services::{RegisterUserRequest, UserDirectoryError};

#[rstest]
#[case::same_username("alice", "+447000000002", "username")]
#[case::same_phone("bob", "+447000000001", "phone")]
fn duplicate_registration_maps_the_violated_constraint(
    postgres_context: Option<PostgresContext>,
    #[case] username: &str,
    #[case] phone: &str,
    #[case] clashing_field: &str,
) -> Result<()> {
    let Some(context) = postgres_context else {
        return Ok(());
    };
    context.register("alice", 1, RoleFlags::customer())?;

    let request =
        RegisterUserRequest::new(username, phone, "brass-lantern-42", RoleFlags::employee());
    let result = context.runtime.block_on(context.directory.register(request));

    let Err(err) = result else {
        bail!("duplicate {clashing_field} must be rejected");
    };
    ensure!(
        err.kind() == FailureKind::Validation,
        "unexpected kind {}",
        err.kind()
    );
    let reported = match &err {
        UserDirectoryError::Repository(UserRepositoryError::DuplicateUsername(name)) => {
            ("username", name.to_string())
        }
        UserDirectoryError::Repository(UserRepositoryError::DuplicatePhone(phone)) => {
            ("phone", phone.to_string())
        }
        other => bail!("duplicate {clashing_field} reported as {other:?}"),
    };
    ensure!(
        reported.0 == clashing_field,
        "duplicate {clashing_field} reported as duplicate {}",
        reported.0
    );
    let expected_value = if clashing_field == "username" {
        "alice"
    } else {
        "+447000000001"
    };
    ensure!(reported.1 == expected_value, "reported value {}", reported.1);
    let listed = context.runtime.block_on(context.directory.list_users())?;
    ensure!(listed.len() == 1, "rejected registration must not be stored");
    Ok(())
}

#[rstest]
fn stored_user_is_found_by_id_and_username(
    postgres_context: Option<PostgresContext>,
) -> Result<()> {
    let Some(context) = postgres_context else {
        return Ok(());
    };
    let dana = context.register("dana", 7, RoleFlags::new(true, true))?;
    let username = Username::new("dana")?;

    let by_id = context.runtime.block_on(context.user_store.find_by_id(dana.id()))?;
    let by_name = context
        .runtime
        .block_on(context.user_store.find_by_username(&username))?;

    for found in [by_id, by_name] {
        let Some(user) = found else {
            bail!("stored user must be found");
        };
        ensure!(user.id() == dana.id(), "different user returned");
        ensure!(user.phone() == dana.phone(), "phone not persisted");
        ensure!(
            user.is_customer() && user.is_employee(),
            "role flags not persisted"
        );
        ensure!(
            user.password_digest() == dana.password_digest(),
            "digest not persisted"
        );
    }
    Ok(())
}

#[rstest]
fn unknown_username_is_absent(postgres_context: Option<PostgresContext>) -> Result<()> {
    let Some(context) = postgres_context else {
        return Ok(());
    };
    let found = context
        .runtime
        .block_on(context.directory.find_by_username("nobody-here"))?;

    ensure!(found.is_none(), "unknown username must not resolve");
    Ok(())
}
