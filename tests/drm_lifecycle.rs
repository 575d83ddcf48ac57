// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/sgpcore

//! End-to-end lifecycle tests: master creation, distribution minting,
//! forking, rejection, permission updates.

use sgp_core::{
    create_master, embed_payload, extract_payload, generate_distribution,
    update_master_permissions, CodecContext, MasterDecision, Permissions, RgbImage,
    WatermarkPayload, WmError,
};

const TEST_KEY: &[u8] = b"test-key-32-bytes-................";
const OWNER: u128 = 12345;
const RECIPIENT: u128 = 987654321098765432109876; // 25 digits, fits 80 bits

fn gradient(w: usize, h: usize) -> RgbImage {
    let mut data = Vec::with_capacity(w * h * 3);
    for y in 0..h {
        for x in 0..w {
            let v = (16 + (x + y) * 223 / (w + h - 2)) as u8;
            data.extend_from_slice(&[v, v, v]);
        }
    }
    RgbImage::from_raw(w, h, data).unwrap()
}

fn ctx() -> CodecContext {
    CodecContext::with_default_step(TEST_KEY.to_vec())
}

fn derivative_ok() -> Permissions {
    Permissions {
        allow_derivative: true,
        allow_reprint: false,
    }
}

#[test]
fn create_master_on_clean_image() {
    let img = gradient(768, 768);
    let (master, decision) = create_master(&img, OWNER, derivative_ok(), &ctx()).unwrap();
    assert_eq!(decision, MasterDecision::CreateMaster);

    let (payload, confidence) = extract_payload(&master, &ctx()).unwrap();
    let payload = payload.unwrap();
    assert_eq!(payload.original_uid, OWNER);
    assert_eq!(payload.current_uid, 0);
    assert!(payload.allow_derivative);
    assert!(!payload.allow_reprint);
    assert!(confidence >= 0.95);
}

#[test]
fn owner_updates_own_master() {
    let img = gradient(768, 768);
    let (master, _) = create_master(&img, OWNER, derivative_ok(), &ctx()).unwrap();

    let (updated, decision) = create_master(
        &master,
        OWNER,
        Permissions {
            allow_derivative: false,
            allow_reprint: true,
        },
        &ctx(),
    )
    .unwrap();
    assert_eq!(decision, MasterDecision::UpdateMaster);

    let (payload, _) = extract_payload(&updated, &ctx()).unwrap();
    let payload = payload.unwrap();
    assert_eq!(payload.original_uid, OWNER);
    assert!(!payload.allow_derivative);
    assert!(payload.allow_reprint);
}

#[test]
fn distribution_carries_owner_and_recipient() {
    let img = gradient(768, 768);
    let (master, _) = create_master(&img, OWNER, derivative_ok(), &ctx()).unwrap();

    let dist = generate_distribution(&master, RECIPIENT, &ctx()).unwrap();
    let (payload, confidence) = extract_payload(&dist, &ctx()).unwrap();
    let payload = payload.unwrap();
    assert_eq!(payload.original_uid, OWNER);
    assert_eq!(payload.current_uid, RECIPIENT);
    assert!(payload.allow_derivative);
    assert!(!payload.allow_reprint);
    assert!(!payload.is_master());
    assert!(confidence >= 0.95);
}

#[test]
fn fork_allowed_when_derivative_permitted() {
    let img = gradient(768, 768);
    let (master, _) = create_master(&img, OWNER, derivative_ok(), &ctx()).unwrap();

    let (fork, decision) = create_master(&master, 77777, derivative_ok(), &ctx()).unwrap();
    assert_eq!(decision, MasterDecision::ForkMaster);

    let (payload, _) = extract_payload(&fork, &ctx()).unwrap();
    let payload = payload.unwrap();
    assert_eq!(payload.original_uid, 77777, "fork re-owns the work");
    assert_eq!(payload.current_uid, 0);
}

#[test]
fn fork_denied_when_derivative_forbidden() {
    let img = gradient(768, 768);
    let locked = WatermarkPayload::master(OWNER, false, false);
    let master = embed_payload(&img, &locked, &ctx()).unwrap();

    match create_master(&master, 77777, derivative_ok(), &ctx()) {
        Err(WmError::DerivativeForbidden { original_uid }) => {
            assert_eq!(original_uid, OWNER)
        }
        other => panic!("expected DerivativeForbidden, got {other:?}"),
    }
}

#[test]
fn distribution_requires_a_master() {
    let img = gradient(768, 768);

    // No watermark at all.
    match generate_distribution(&img, RECIPIENT, &ctx()) {
        Err(WmError::DecodeFailed) => {}
        other => panic!("expected DecodeFailed, got {other:?}"),
    }

    // A distribution copy is not a master.
    let (master, _) = create_master(&img, OWNER, derivative_ok(), &ctx()).unwrap();
    let dist = generate_distribution(&master, RECIPIENT, &ctx()).unwrap();
    match generate_distribution(&dist, 31337, &ctx()) {
        Err(WmError::NotAMaster { current_uid }) => assert_eq!(current_uid, RECIPIENT),
        other => panic!("expected NotAMaster, got {other:?}"),
    }
}

#[test]
fn distribution_rejects_null_recipient() {
    let img = gradient(768, 768);
    let (master, _) = create_master(&img, OWNER, derivative_ok(), &ctx()).unwrap();
    assert!(matches!(
        generate_distribution(&master, 0, &ctx()),
        Err(WmError::NullRecipient)
    ));
}

#[test]
fn recipient_uid_overflow_rejected_at_boundary() {
    let img = gradient(768, 768);
    let (master, _) = create_master(&img, OWNER, derivative_ok(), &ctx()).unwrap();
    match generate_distribution(&master, 1u128 << 80, &ctx()) {
        Err(WmError::UidOverflow { max_bits: 80, .. }) => {}
        other => panic!("expected UidOverflow, got {other:?}"),
    }
}

#[test]
fn actor_uid_overflow_rejected_before_any_work() {
    let img = gradient(768, 768);
    match create_master(&img, 1u128 << 96, derivative_ok(), &ctx()) {
        Err(WmError::UidOverflow { max_bits: 96, .. }) => {}
        other => panic!("expected UidOverflow, got {other:?}"),
    }
}

#[test]
fn permission_update_preserves_owner_and_master_status() {
    let img = gradient(768, 768);
    let (master, _) = create_master(&img, OWNER, derivative_ok(), &ctx()).unwrap();

    let updated = update_master_permissions(
        &master,
        Permissions {
            allow_derivative: false,
            allow_reprint: true,
        },
        &ctx(),
    )
    .unwrap();

    let (payload, _) = extract_payload(&updated, &ctx()).unwrap();
    let payload = payload.unwrap();
    assert_eq!(payload.original_uid, OWNER);
    assert!(payload.is_master());
    assert!(!payload.allow_derivative);
    assert!(payload.allow_reprint);
}

#[test]
fn permission_update_rejects_distribution_copies() {
    let img = gradient(768, 768);
    let (master, _) = create_master(&img, OWNER, derivative_ok(), &ctx()).unwrap();
    let dist = generate_distribution(&master, RECIPIENT, &ctx()).unwrap();

    assert!(matches!(
        update_master_permissions(&dist, derivative_ok(), &ctx()),
        Err(WmError::NotAMaster { .. })
    ));
}

#[test]
fn create_master_propagates_too_small() {
    let img = gradient(256, 256);
    assert!(matches!(
        create_master(&img, OWNER, derivative_ok(), &ctx()),
        Err(WmError::TooSmall)
    ));
}
