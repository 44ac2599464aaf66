//! In-memory integration tests for the user directory.

use super::helpers::{Backend, backend};
use rstest::rstest;
use taskdesk::failure::FailureKind;
use taskdesk::user::{
    domain::{RoleFlags, UserId},
    services::{RegisterUserRequest, RequestContext},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn registered_users_are_listed_and_resolvable(backend: Backend) -> Result<(), eyre::Report> {
    let carol = backend.register("carol", 1, RoleFlags::customer()).await?;
    let evan = backend.register("evan", 2, RoleFlags::employee()).await?;

    let listed = backend.directory.list_users().await?;
    let resolved = backend.authenticate(&evan).await?;

    eyre::ensure!(listed == vec![carol, evan.clone()], "unexpected user listing");
    eyre::ensure!(resolved == evan, "context resolved the wrong user");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn serialized_user_omits_password_digest(backend: Backend) -> Result<(), eyre::Report> {
    let carol = backend.register("carol", 1, RoleFlags::customer()).await?;

    let json = serde_json::to_value(&carol)?;

    eyre::ensure!(json.get("username").is_some(), "username missing");
    eyre::ensure!(
        json.get("password_digest").is_none(),
        "password digest leaked into serialized user"
    );
    Ok(())
}

#[rstest]
#[case::same_username("carol", "+4470000123")]
#[case::same_phone("dave", "+447000000001")]
#[tokio::test(flavor = "multi_thread")]
async fn duplicates_are_rejected_without_side_effects(
    backend: Backend,
    #[case] username: &str,
    #[case] phone: &str,
) -> Result<(), eyre::Report> {
    backend.register("carol", 1, RoleFlags::customer()).await?;

    let result = backend
        .directory
        .register(RegisterUserRequest::new(
            username,
            phone,
            "brass-lantern-42",
            RoleFlags::employee(),
        ))
        .await;

    let Err(err) = result else {
        eyre::bail!("duplicate registration succeeded");
    };
    eyre::ensure!(
        err.kind() == FailureKind::Validation,
        "unexpected kind {}",
        err.kind()
    );
    eyre::ensure!(
        backend.directory.list_users().await?.len() == 1,
        "rejected registration was stored"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_context_is_unauthenticated(backend: Backend) -> Result<(), eyre::Report> {
    let result = backend
        .directory
        .current_user(&RequestContext::authenticated(UserId::new()))
        .await;

    let Err(err) = result else {
        eyre::bail!("unknown identity resolved");
    };
    eyre::ensure!(err.kind() == FailureKind::Unauthenticated, "unexpected kind");
    Ok(())
}
