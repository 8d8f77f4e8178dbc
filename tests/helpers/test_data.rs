//! Test data helpers
//!
//! Builders that go through the public services so every fixture obeys the
//! same rules production data does.

use chrono::{Duration, Utc};
use ewm_server::models::category::{Category, NewCategory};
use ewm_server::models::event::{
    AdminStateAction, Event, EventView, Location, NewEvent, UpdateEventAdminRequest,
};
use ewm_server::models::request::ParticipationRequest;
use ewm_server::models::user::{NewUser, User};
use ewm_server::Result;

use super::test_context::TestContext;

pub async fn create_test_user(ctx: &TestContext, name: &str) -> User {
    ctx.services
        .user_service
        .create(NewUser {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        })
        .await
        .expect("Failed to create user")
}

pub async fn create_test_category(ctx: &TestContext, name: &str) -> Category {
    ctx.services
        .category_service
        .create(NewCategory { name: name.to_string() })
        .await
        .expect("Failed to create category")
}

pub fn new_test_event(category_id: i64, participant_limit: i32, request_moderation: bool) -> NewEvent {
    NewEvent {
        title: "Swing night".to_string(),
        annotation: "A night of swing dancing with a live band".to_string(),
        description: "Beginners welcome, a short lesson opens the evening".to_string(),
        category_id,
        event_date: Utc::now() + Duration::days(3),
        location: Location { lat: 55.75, lon: 37.62 },
        paid: false,
        participant_limit,
        request_moderation,
    }
}

/// Admin PUBLISH_EVENT
pub async fn publish(ctx: &TestContext, event_id: i64) -> Result<EventView> {
    let publish = UpdateEventAdminRequest {
        state_action: Some(AdminStateAction::PublishEvent),
        ..Default::default()
    };
    ctx.services.event_service.update_event_by_admin(event_id, publish).await
}

/// Create an event and publish it through admin moderation
pub async fn create_published_event(
    ctx: &TestContext,
    initiator: &User,
    category: &Category,
    participant_limit: i32,
    request_moderation: bool,
) -> Event {
    let created = ctx
        .services
        .event_service
        .add_event(initiator.id, new_test_event(category.id, participant_limit, request_moderation))
        .await
        .expect("Failed to create event");

    publish(ctx, created.event.id)
        .await
        .expect("Failed to publish event")
        .event
}

/// Submit one request per freshly created user, in order
pub async fn submit_requests(ctx: &TestContext, event: &Event, count: usize) -> Vec<ParticipationRequest> {
    let mut requests = Vec::with_capacity(count);
    for i in 0..count {
        let user = create_test_user(ctx, &format!("Guest {} {}", event.id, i)).await;
        let request = ctx
            .services
            .request_service
            .submit(user.id, event.id)
            .await
            .expect("Failed to submit request");
        requests.push(request);
    }
    requests
}

/// Everything a moderation test needs: initiator, a published event and pending requests
pub async fn moderation_fixture(
    ctx: &TestContext,
    participant_limit: i32,
    pending: usize,
) -> (User, Event, Vec<ParticipationRequest>) {
    let initiator = create_test_user(ctx, "Initiator").await;
    let category = create_test_category(ctx, "Dance").await;
    let event = create_published_event(ctx, &initiator, &category, participant_limit, true).await;
    let requests = submit_requests(ctx, &event, pending).await;
    (initiator, event, requests)
}
