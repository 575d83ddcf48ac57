// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/sgpcore

//! Cancellation behavior. Kept in its own binary because the cancel flag is
//! process-global; running it beside other pipeline tests would poison them.

use sgp_core::wm::progress;
use sgp_core::{embed_payload, CodecContext, RgbImage, WatermarkPayload, WmError};

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

#[test]
fn cancelled_call_returns_without_output() {
    let img = gradient(768, 768);
    let payload = WatermarkPayload::master(5, false, false);
    let ctx = CodecContext::with_default_step(b"cancel-key".to_vec());

    progress::init(0);
    progress::cancel();
    assert!(progress::is_cancelled());
    assert!(matches!(
        embed_payload(&img, &payload, &ctx),
        Err(WmError::Cancelled)
    ));

    // A fresh call after reset proceeds normally.
    progress::init(0);
    let marked = embed_payload(&img, &payload, &ctx).unwrap();
    assert_eq!(marked.width(), 768);
}
