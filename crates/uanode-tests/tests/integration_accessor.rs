// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Accessor Integration Tests
//!
//! Typed property access over the mock channel and resolver.
//!
//! ## Test Categories
//!
//! - **Local cache**: `get` and `set` never touch the channel
//! - **Network I/O**: writes echo through reads, in async and blocking form
//! - **Values**: enumerations, structures and arrays
//! - **Failures**: Bad statuses, channel errors, interruption

use std::thread;
use std::time::Duration;

use uanode_client::prelude::*;
use uanode_core::{
    Argument, AttributeId, DataValue, EncodingLimits, KeyValuePair, MessageSecurityMode,
    ApplicationType,
};
use uanode_tests::common::*;

// =============================================================================
// Local Cache
// =============================================================================

#[tokio::test]
async fn test_get_before_resolution_is_node_absent() {
    init_test_logging();
    let tree = FakeNodeTree::new();
    let config = tree.application_configuration();

    config.enabled().get().assert_node_absent();
    config.enabled().set(true).assert_node_absent();
    assert_eq!(tree.channel.read_count(), 0);
    assert_eq!(tree.resolver.resolve_count(), 0);
}

#[tokio::test]
async fn test_set_then_get_without_io() {
    init_test_logging();
    let tree = FakeNodeTree::new();
    let config = tree.full_application_configuration();

    for name in ["ApplicationUri", "ProductUri", "ApplicationType", "Enabled"] {
        tree.resolve(config.node(), name).await;
    }

    config
        .application_uri()
        .set("urn:sylvex:app".to_string())
        .assert_ok();
    config
        .product_uri()
        .set("urn:sylvex:product".to_string())
        .assert_ok();
    config
        .application_type()
        .set(ApplicationType::ClientAndServer)
        .assert_ok();
    config.enabled().set(false).assert_ok();

    assert_eq!(
        config.application_uri().get().assert_ok().as_deref(),
        Some("urn:sylvex:app")
    );
    assert_eq!(
        config.product_uri().get().assert_ok().as_deref(),
        Some("urn:sylvex:product")
    );
    assert_eq!(
        config.application_type().get().assert_ok(),
        Some(Decoded::Value(ApplicationType::ClientAndServer))
    );
    assert_eq!(config.enabled().get().assert_ok(), Some(false));

    assert_eq!(tree.channel.read_count(), 0);
    assert_eq!(tree.channel.write_count(), 0);
}

#[tokio::test]
async fn test_resolved_property_without_value_gets_none() {
    init_test_logging();
    let tree = FakeNodeTree::new();
    let config = tree.application_configuration();

    config.enabled().get_node_async().await.assert_ok();
    assert_eq!(config.enabled().get().assert_ok(), None);
}

// =============================================================================
// Network I/O
// =============================================================================

#[tokio::test]
async fn test_write_async_echoes_through_read_async() {
    init_test_logging();
    let tree = FakeNodeTree::new();
    let group = tree.pubsub_group();

    group
        .security_mode()
        .write_async(MessageSecurityMode::SignAndEncrypt)
        .await
        .assert_ok();
    group
        .security_group_id()
        .write_async("group-7".to_string())
        .await
        .assert_ok();
    group
        .max_network_message_size()
        .write_async(1400)
        .await
        .assert_ok();

    assert_eq!(
        group.security_mode().read_async().await.assert_ok(),
        Some(Decoded::Value(MessageSecurityMode::SignAndEncrypt))
    );
    assert_eq!(
        group.security_group_id().read_async().await.assert_ok().as_deref(),
        Some("group-7")
    );
    assert_eq!(
        group.max_network_message_size().read_async().await.assert_ok(),
        Some(1400)
    );
    assert_eq!(tree.channel.write_count(), 3);
    assert_eq!(tree.channel.read_count(), 3);
}

#[tokio::test]
async fn test_write_updates_local_value() {
    init_test_logging();
    let tree = FakeNodeTree::new();
    let group = tree.pubsub_group();

    group
        .max_network_message_size()
        .write_async(9000)
        .await
        .assert_ok();

    let reads_before = tree.channel.read_count();
    assert_eq!(group.max_network_message_size().get().assert_ok(), Some(9000));
    assert_eq!(tree.channel.read_count(), reads_before);
}

#[tokio::test]
async fn test_read_refreshes_local_value() {
    init_test_logging();
    let tree = FakeNodeTree::new();
    let group = tree.pubsub_group();
    let member = property_node_id(group.node().node_id(), "SecurityGroupId");
    tree.channel.store_value(member, "from-server");

    assert_eq!(
        group.security_group_id().read_async().await.assert_ok().as_deref(),
        Some("from-server")
    );
    assert_eq!(
        group.security_group_id().get().assert_ok().as_deref(),
        Some("from-server")
    );
}

#[test]
fn test_blocking_write_then_read() {
    init_test_logging();
    let tree = FakeNodeTree::new();
    let connection = tree.pubsub_connection();

    let status = connection
        .publisher_id()
        .write(Variant::UInt16(42))
        .assert_ok();
    assert_eq!(status, StatusCode::GOOD);

    assert_eq!(
        connection.publisher_id().read().assert_ok(),
        Some(Variant::UInt16(42))
    );
    assert!(connection.publisher_id().get_node().assert_ok().is_some());
}

#[tokio::test]
async fn test_blocking_calls_from_async_test_run_on_a_thread() {
    init_test_logging();
    let tree = FakeNodeTree::new();
    let config = tree.application_configuration();

    let handle = config.clone();
    let status = run_blocking(move || handle.enabled().write(true)).assert_ok();
    assert_eq!(status, StatusCode::GOOD);
    assert_eq!(config.enabled().read_async().await.assert_ok(), Some(true));
}

#[test]
fn test_blocking_calls_over_timer_backed_channel() {
    init_test_logging();
    let tree = FakeNodeTree::new();
    assert!(tree.context.runtime().is_dedicated());
    tree.channel.set_latency(Duration::from_millis(1));
    let config = tree.application_configuration();

    assert_eq!(config.enabled().write(true).assert_ok(), StatusCode::GOOD);
    assert_eq!(config.enabled().read().assert_ok(), Some(true));
    assert_eq!(tree.channel.read_count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_blocking_calls_over_timer_backed_channel_share_runtime() {
    init_test_logging();
    let tree = FakeNodeTree::new();
    assert!(!tree.context.runtime().is_dedicated());
    tree.channel.set_latency(Duration::from_millis(1));
    let config = tree.application_configuration();

    let handle = config.clone();
    let value = run_blocking(move || {
        handle.enabled().write(false)?;
        handle.enabled().read()
    })
    .assert_ok();
    assert_eq!(value, Some(false));
    assert_eq!(config.enabled().get().assert_ok(), Some(false));
}

// =============================================================================
// The Enabled Scenario
// =============================================================================

#[test]
fn test_enabled_scenario() {
    init_test_logging();
    let tree = FakeNodeTree::new();
    let config = tree.application_configuration();

    config.enabled().get().assert_node_absent();

    config.enabled().write(true).assert_ok();
    let reads_after_write = tree.channel.read_count();

    assert_eq!(config.enabled().get().assert_ok(), Some(true));
    assert_eq!(tree.channel.read_count(), reads_after_write);
    assert_eq!(tree.resolver.resolve_count(), 1);
}

// =============================================================================
// Values
// =============================================================================

#[tokio::test]
async fn test_unknown_enumeration_value_is_kept() {
    init_test_logging();
    let tree = FakeNodeTree::new();
    let group = tree.pubsub_group();
    let member = property_node_id(group.node().node_id(), "SecurityMode");
    tree.channel.store_value(member, Variant::Int32(99));

    let value = group.security_mode().read_async().await.assert_ok();
    assert_eq!(value, Some(Decoded::Unknown(Variant::Int32(99))));
    assert!(value.map_or(false, |v| v.is_unknown()));
}

#[tokio::test]
async fn test_empty_value_reads_as_none() {
    init_test_logging();
    let tree = FakeNodeTree::new();
    let group = tree.pubsub_group();

    assert_eq!(group.security_mode().read_async().await.assert_ok(), None);
    assert_eq!(group.group_properties().read_async().await.assert_ok(), None);
}

#[tokio::test]
async fn test_argument_arrays_round_trip() {
    init_test_logging();
    let tree = FakeNodeTree::new();
    let method = tree.method();

    method
        .input_arguments()
        .write_async(sample_arguments())
        .await
        .assert_ok();
    method
        .output_arguments()
        .write_async(Vec::new())
        .await
        .assert_ok();

    assert_eq!(
        method.input_arguments().read_async().await.assert_ok(),
        Some(sample_arguments())
    );
    assert_eq!(
        method.output_arguments().read_async().await.assert_ok(),
        Some(Vec::<Argument>::new())
    );
}

#[tokio::test]
async fn test_argument_arrays_are_stored_encoded() {
    init_test_logging();
    let tree = FakeNodeTree::new();
    let method = tree.method();
    let member = method.input_arguments().get_node_async().await.assert_ok();
    let member = member.expect("InputArguments must resolve");

    method.input_arguments().set(sample_arguments()).assert_ok();

    let cached = member.value().expect("value must be cached");
    let items = cached.value.as_array().expect("cached value must be an array");
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|item| item.as_extension_object().is_some()));
    assert_eq!(
        method.input_arguments().get().assert_ok(),
        Some(sample_arguments())
    );
}

#[tokio::test]
async fn test_key_value_pairs_round_trip() {
    init_test_logging();
    let tree = FakeNodeTree::new();
    let connection = tree.pubsub_connection();
    let group = tree.pubsub_group();

    connection
        .connection_properties()
        .write_async(sample_key_value_pairs())
        .await
        .assert_ok();
    group
        .group_properties()
        .write_async(Vec::new())
        .await
        .assert_ok();

    assert_eq!(
        connection.connection_properties().read_async().await.assert_ok(),
        Some(sample_key_value_pairs())
    );
    assert_eq!(
        group.group_properties().read_async().await.assert_ok(),
        Some(Vec::<KeyValuePair>::new())
    );
}

#[tokio::test]
async fn test_scalar_where_array_declared_is_rank_mismatch() {
    init_test_logging();
    let tree = FakeNodeTree::new();
    let method = tree.method();
    let member = property_node_id(method.node().node_id(), "InputArguments");
    tree.channel.store_value(member, Variant::Int32(1));

    method.input_arguments().read_async().await.assert_coercion();
}

#[tokio::test]
async fn test_wrong_scalar_type_is_coercion_error() {
    init_test_logging();
    let tree = FakeNodeTree::new();
    let config = tree.application_configuration();
    let member = property_node_id(config.node().node_id(), "Enabled");
    tree.channel.store_value(member, "yes");

    config.enabled().read_async().await.assert_coercion();
}

#[tokio::test]
async fn test_array_over_limit_is_rejected_before_sending() {
    init_test_logging();
    let tree = FakeNodeTree::with_limits(EncodingLimits {
        max_array_length: 1,
        ..EncodingLimits::default()
    });
    let method = tree.method();

    let error = method
        .input_arguments()
        .write_async(sample_arguments())
        .await
        .expect_err("two arguments exceed the limit");
    assert_eq!(error.status_code(), StatusCode::BAD_ENCODING_LIMITS_EXCEEDED);
    assert_eq!(tree.channel.write_count(), 0);
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_rejected_write_async_is_service_error() {
    init_test_logging();
    let tree = FakeNodeTree::new();
    let config = tree.application_configuration();
    tree.channel.reject_writes_with(StatusCode::BAD_NOT_WRITABLE);

    config
        .enabled()
        .write_async(true)
        .await
        .assert_service_status(StatusCode::BAD_NOT_WRITABLE);

    assert_eq!(config.enabled().get().assert_ok(), None);
    let stats = tree.context.stats().snapshot();
    assert_eq!(stats.failures, 1);
}

#[test]
fn test_rejected_blocking_write_is_service_error() {
    init_test_logging();
    let tree = FakeNodeTree::new();
    let group = tree.pubsub_group();
    tree.channel.reject_writes_with(StatusCode::BAD_USER_ACCESS_DENIED);

    group
        .security_mode()
        .write(MessageSecurityMode::Sign)
        .assert_service_status(StatusCode::BAD_USER_ACCESS_DENIED);
    assert_eq!(tree.channel.write_history().len(), 1);
}

#[test]
fn test_failed_typed_operations_are_logged() {
    init_test_logging();
    let tree = FakeNodeTree::new();
    let group = tree.pubsub_group();
    tree.channel.reject_writes_with(StatusCode::BAD_NOT_WRITABLE);

    let (result, logs) = capture_logs(|| group.security_mode().write(MessageSecurityMode::Sign));
    result.assert_service_status(StatusCode::BAD_NOT_WRITABLE);

    let output = logs.contents();
    assert!(output.contains("ERROR"));
    assert!(output.contains("UA-0102"));
    assert!(output.contains("retryable=false"));
    assert!(output.contains("write SecurityMode"));
}

#[tokio::test]
async fn test_bad_read_status_is_service_error() {
    init_test_logging();
    let tree = FakeNodeTree::new();
    let config = tree.application_configuration();
    config.enabled().write_async(true).await.assert_ok();

    tree.channel.bad_next_read(StatusCode::BAD_NOT_READABLE);
    config
        .enabled()
        .read_async()
        .await
        .assert_service_status(StatusCode::BAD_NOT_READABLE);

    // The previously observed value survives the failed read.
    assert_eq!(config.enabled().get().assert_ok(), Some(true));
}

#[tokio::test]
async fn test_channel_failure_keeps_its_status() {
    init_test_logging();
    let tree = FakeNodeTree::new();
    let config = tree.application_configuration();

    tree.channel.fail_next_read();
    config
        .enabled()
        .read_async()
        .await
        .assert_service_status(StatusCode::BAD_COMMUNICATION_ERROR);

    assert_eq!(config.enabled().read_async().await.assert_ok(), None);
}

#[tokio::test]
async fn test_missing_property_is_node_absent_for_io() {
    init_test_logging();
    let tree = FakeNodeTree::new();
    let config = tree.application_configuration();

    assert!(config.product_uri().get_node_async().await.assert_ok().is_none());
    config.product_uri().read_async().await.assert_node_absent();
    config
        .product_uri()
        .write_async("urn:x".to_string())
        .await
        .assert_node_absent();
    config.product_uri().get().assert_node_absent();
    assert_eq!(tree.channel.write_count(), 0);
}

#[test]
fn test_interrupted_blocking_read() {
    init_test_logging();
    let tree = FakeNodeTree::new();
    let config = tree.application_configuration();
    tree.channel.set_hang(true);

    let interrupter = tree.context.interrupter().clone();
    let trigger = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        interrupter.interrupt();
    });

    config.enabled().read().assert_interrupted();
    trigger.join().unwrap();

    // Later calls fail fast until the interrupter is reset.
    config.enabled().write(true).assert_interrupted();

    tree.context.interrupter().reset();
    tree.channel.set_hang(false);
    config.enabled().write(true).assert_ok();
    assert_eq!(config.enabled().read().assert_ok(), Some(true));
}

#[tokio::test]
async fn test_base_attributes_are_cached() {
    init_test_logging();
    let tree = FakeNodeTree::new();
    let config = tree.application_configuration();
    let node = config.node();
    tree.channel.store(
        node.node_id().clone(),
        AttributeId::DisplayName,
        DataValue::value_only(uanode_core::LocalizedText::new("en", "Application")),
    );

    let first = node.read_display_name().await.assert_ok();
    let second = node.read_display_name().await.assert_ok();
    assert_eq!(first, second);
    assert_eq!(first.map(|t| t.text), Some("Application".to_string()));
    assert_eq!(tree.channel.read_count(), 1);
}

#[tokio::test]
async fn test_inherited_properties_through_base_view() {
    init_test_logging();
    let tree = FakeNodeTree::new();
    let node = tree.object(4000, "AuditEvent");
    tree.add_all_properties(node.node_id(), AuditEventType::type_info());
    let audit = AuditEventType::new(node);

    audit
        .base()
        .message()
        .write_async(uanode_core::LocalizedText::text("Login"))
        .await
        .assert_ok();
    audit.status().write_async(true).await.assert_ok();

    assert_eq!(
        audit.base().message().get().assert_ok().map(|t| t.text),
        Some("Login".to_string())
    );
    assert_eq!(audit.status().get().assert_ok(), Some(true));
}
