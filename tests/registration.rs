mod common;

use axum_storefront::{
    config::StockPolicy, dto::auth::RegisterRequest, error::AppError,
    services::auth_service::register_user,
};
use tokio::task::JoinSet;
use uuid::Uuid;

// Racing sign-ups for one address: exactly one wins, the rest are told it is taken.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_registrations_with_one_email() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };
    let state = common::connect_state(&database_url, StockPolicy::Enforce).await?;
    let email = format!("race-{}@example.com", Uuid::new_v4());

    let mut tasks = JoinSet::new();
    for _ in 0..8 {
        let state = state.clone();
        let payload = RegisterRequest {
            email: email.clone(),
            password: "hunter2".into(),
        };
        tasks.spawn(async move { register_user(&state, payload).await });
    }

    let mut created = 0;
    let mut taken = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined? {
            Ok(_) => created += 1,
            Err(AppError::BadRequest(message)) => {
                assert_eq!(message, "Email is already taken");
                taken += 1;
            }
            Err(unexpected) => panic!("expected success or BadRequest, got {unexpected:?}"),
        }
    }
    assert_eq!(created, 1);
    assert_eq!(taken, 7);
    Ok(())
}
