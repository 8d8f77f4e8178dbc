//! View and confirmed-count annotation

mod helpers;

use std::sync::Arc;
use helpers::*;
use ewm_server::models::event::EventFilter;
use ewm_server::models::page::Page;
use ewm_server::services::EventAnnotator;
use ewm_server::utils::helpers::event_uri;

#[tokio::test]
async fn test_ten_events_one_stats_call() {
    let ctx = TestContext::new();
    let initiator = create_test_user(&ctx, "Organizer").await;
    let category = create_test_category(&ctx, "Festivals").await;

    let mut events = Vec::new();
    for _ in 0..10 {
        events.push(create_published_event(&ctx, &initiator, &category, 0, false).await);
    }
    submit_requests(&ctx, &events[0], 2).await;

    let stats = Arc::new(RecordingStatsClient::default());
    for (i, event) in events.iter().take(6).enumerate() {
        stats.set_views(&event_uri(event.id), (i as i64 + 1) * 10);
    }

    let annotator = EventAnnotator::new(ctx.stores.requests.clone(), stats.clone());
    let views = annotator.annotate(events.clone()).await.unwrap();

    assert_eq!(stats.batch_calls(), 1);
    assert_eq!(stats.single_calls(), 0);
    assert_eq!(views.iter().filter(|v| v.views > 0).count(), 6);
    assert_eq!(views.iter().filter(|v| v.views == 0).count(), 4);
    assert_eq!(views[0].views, 10);
    assert_eq!(views[0].event.confirmed_requests, 2);

    let order: Vec<i64> = views.iter().map(|v| v.event.id).collect();
    let expected: Vec<i64> = events.iter().map(|e| e.id).collect();
    assert_eq!(order, expected);
}

#[tokio::test]
async fn test_empty_list_makes_no_calls() {
    let ctx = TestContext::new();
    let annotator = EventAnnotator::new(ctx.stores.requests.clone(), ctx.stats.clone());

    let views = annotator.annotate(Vec::new()).await.unwrap();
    assert!(views.is_empty());
    assert_eq!(ctx.stats.batch_calls(), 0);
}

#[tokio::test]
async fn test_admin_search_is_annotated_in_one_call() {
    let ctx = TestContext::new();
    let initiator = create_test_user(&ctx, "Organizer").await;
    let category = create_test_category(&ctx, "Markets").await;
    let first = create_published_event(&ctx, &initiator, &category, 0, false).await;
    create_published_event(&ctx, &initiator, &category, 0, false).await;
    ctx.stats.set_views(&event_uri(first.id), 5);

    let views = ctx
        .services
        .event_service
        .search_events_admin(EventFilter::default(), Page::default())
        .await
        .unwrap();

    assert_eq!(views.len(), 2);
    assert_eq!(views[0].views, 5);
    assert_eq!(ctx.stats.batch_calls(), 1);
}

#[tokio::test]
async fn test_single_event_uses_single_uri_call() {
    let ctx = TestContext::new();
    let initiator = create_test_user(&ctx, "Organizer").await;
    let category = create_test_category(&ctx, "Lectures").await;
    let event = create_published_event(&ctx, &initiator, &category, 0, false).await;

    let stats = Arc::new(RecordingStatsClient::default());
    stats.set_views(&event_uri(event.id), 3);

    let annotator = EventAnnotator::new(ctx.stores.requests.clone(), stats.clone());
    let view = annotator.annotate_one(event).await.unwrap();

    assert_eq!(view.views, 3);
    assert_eq!(stats.single_calls(), 1);
    assert_eq!(stats.batch_calls(), 0);
}
