//! Error handling step definitions.

use cucumber::{given, then, World};
use stockroom_client::validation::require_non_empty;
use stockroom_client::ClientError;

/// Test context for error handling scenarios.
#[derive(Debug, World)]
#[world(init = Self::new)]
pub struct ErrorHandlingWorld {
    current_error: Option<ClientError>,
}

impl ErrorHandlingWorld {
    fn new() -> Self {
        Self {
            current_error: None,
        }
    }

    fn error(&self) -> &ClientError {
        self.current_error.as_ref().expect("no error")
    }
}

// --- Given steps ---

#[given("the server is unreachable")]
async fn given_server_unreachable(world: &mut ErrorHandlingWorld) {
    world.current_error = Some(ClientError::Connection("connection refused".to_string()));
}

#[given("the server rejects the session token")]
async fn given_token_rejected(world: &mut ErrorHandlingWorld) {
    world.current_error = Some(ClientError::Unauthorized);
}

#[given(expr = "the server answers {int} with message {string}")]
async fn given_server_answers(world: &mut ErrorHandlingWorld, status: u16, message: String) {
    world.current_error = Some(ClientError::Api { status, message });
}

#[given("a request with a blank product name")]
async fn given_blank_name(world: &mut ErrorHandlingWorld) {
    world.current_error = require_non_empty("   ", "name").err();
}

// --- Then steps ---

#[then("the error should be a connection error")]
async fn then_is_connection_error(world: &mut ErrorHandlingWorld) {
    assert!(world.error().is_connection_error());
}

#[then("the error should be unauthorized")]
async fn then_is_unauthorized(world: &mut ErrorHandlingWorld) {
    assert!(world.error().is_unauthorized());
}

#[then("the error should be retryable")]
async fn then_is_retryable(world: &mut ErrorHandlingWorld) {
    assert!(world.error().is_retryable());
}

#[then("the error should not be retryable")]
async fn then_is_not_retryable(world: &mut ErrorHandlingWorld) {
    assert!(!world.error().is_retryable());
}

#[then(expr = "the error status should be {int}")]
async fn then_status(world: &mut ErrorHandlingWorld, status: u16) {
    assert_eq!(world.error().status(), Some(status));
}

#[then("the error should be a validation error")]
async fn then_is_validation(world: &mut ErrorHandlingWorld) {
    assert!(world.error().is_validation());
}

#[then("the error should be a not found error")]
async fn then_is_not_found(world: &mut ErrorHandlingWorld) {
    assert!(world.error().is_not_found());
}

#[then(expr = "the error message should be {string}")]
async fn then_message(world: &mut ErrorHandlingWorld, message: String) {
    assert_eq!(world.error().message(), message);
}
