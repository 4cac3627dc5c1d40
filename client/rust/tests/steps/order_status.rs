//! Order status workflow step definitions.

use cucumber::{given, then, when, World};
use stockroom_client::{ClientError, OrderStatus, TransitionTable};

/// Test context for workflow scenarios.
#[derive(Debug, World)]
#[world(init = Self::new)]
pub struct OrderStatusWorld {
    current: Option<OrderStatus>,
    offered: Vec<OrderStatus>,
    visited: Vec<OrderStatus>,
    candidates: Vec<OrderStatus>,
    labels: Vec<&'static str>,
    error: Option<ClientError>,
}

impl OrderStatusWorld {
    fn new() -> Self {
        Self {
            current: None,
            offered: Vec::new(),
            visited: Vec::new(),
            candidates: Vec::new(),
            labels: Vec::new(),
            error: None,
        }
    }

    fn current(&self) -> OrderStatus {
        self.current.expect("no current status")
    }
}

fn parse(status: &str) -> OrderStatus {
    status.parse().expect("valid status in feature file")
}

fn parse_list(list: &str) -> Vec<OrderStatus> {
    list.split(',').map(|s| parse(s.trim())).collect()
}

// --- Given steps ---

#[given(expr = "an order in status {word}")]
async fn given_order_in_status(world: &mut OrderStatusWorld, status: String) {
    world.current = Some(parse(&status));
}

#[given("every status except REFUND")]
async fn given_every_status_but_refund(world: &mut OrderStatusWorld) {
    world.candidates = OrderStatus::ALL
        .into_iter()
        .filter(|s| *s != OrderStatus::Refund)
        .collect();
}

// --- When steps ---

#[when("I ask which transitions are available")]
async fn when_ask_transitions(world: &mut OrderStatusWorld) {
    world.offered = world.current().transitions().to_vec();
}

#[when("I follow the primary transition")]
async fn when_follow_primary(world: &mut OrderStatusWorld) {
    let next = world.current().primary_next().expect("no primary transition");
    world.current = Some(next);
}

#[when("I follow primary transitions until none remain")]
async fn when_follow_until_done(world: &mut OrderStatusWorld) {
    let mut current = world.current();
    world.visited = vec![current];
    while let Some(next) = current.primary_next() {
        world.visited.push(next);
        current = next;
    }
    world.current = Some(current);
}

#[when(expr = "I check a transition to {word}")]
async fn when_check_transition(world: &mut OrderStatusWorld, to: String) {
    let table = TransitionTable::builtin();
    world.error = table.check(world.current(), parse(&to)).err();
}

#[when(expr = "I parse the status {string}")]
async fn when_parse_status(world: &mut OrderStatusWorld, raw: String) {
    world.error = raw.parse::<OrderStatus>().err().map(ClientError::from);
}

#[when("I list the kanban columns")]
async fn when_list_columns(world: &mut OrderStatusWorld) {
    world.labels = OrderStatus::kanban_columns()
        .iter()
        .map(|s| s.label())
        .collect();
}

// --- Then steps ---

#[then(regex = r"^the offered transitions should be (.+)$")]
async fn then_offered(world: &mut OrderStatusWorld, expected: String) {
    assert_eq!(world.offered, parse_list(&expected));
}

#[then("no transitions should be offered")]
async fn then_none_offered(world: &mut OrderStatusWorld) {
    assert!(world.offered.is_empty());
}

#[then("the status should be terminal")]
async fn then_terminal(world: &mut OrderStatusWorld) {
    assert!(world.current().is_terminal());
}

#[then("each of them should offer REFUND")]
async fn then_each_offers_refund(world: &mut OrderStatusWorld) {
    assert_eq!(world.candidates.len(), 7);
    for status in &world.candidates {
        assert!(
            status.can_transition_to(OrderStatus::Refund),
            "{status} does not offer REFUND"
        );
    }
}

#[then(expr = "the order should be in status {word}")]
async fn then_in_status(world: &mut OrderStatusWorld, status: String) {
    assert_eq!(world.current(), parse(&status));
}

#[then(regex = r"^the visited statuses should be (.+)$")]
async fn then_visited(world: &mut OrderStatusWorld, expected: String) {
    assert_eq!(world.visited, parse_list(&expected));
}

#[then("no status should have been visited twice")]
async fn then_no_revisit(world: &mut OrderStatusWorld) {
    let mut seen = world.visited.clone();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), world.visited.len());
}

#[then(expr = "the check should fail with an invalid transition from {word} to {word}")]
async fn then_invalid_transition(world: &mut OrderStatusWorld, from: String, to: String) {
    match world.error.as_ref().expect("no error") {
        ClientError::InvalidTransition { from: f, to: t } => {
            assert_eq!(*f, parse(&from));
            assert_eq!(*t, parse(&to));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[then("parsing should fail with an invalid status error")]
async fn then_invalid_status(world: &mut OrderStatusWorld) {
    let err = world.error.as_ref().expect("no error");
    assert!(matches!(err, ClientError::InvalidStatus(_)));
}

#[then(regex = r"^the columns should be (.+)$")]
async fn then_columns(world: &mut OrderStatusWorld, expected: String) {
    let expected: Vec<&str> = expected.split(',').map(str::trim).collect();
    assert_eq!(world.labels, expected);
}
