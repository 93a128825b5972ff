// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod concurrency;
mod config;
mod hooks;
mod posts;
mod properties;
mod support;
