// Copyright (c) SmartInfra Team
// SPDX-License-Identifier: Apache-2.0

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod metrics;
pub mod reports;
pub mod reviews;
pub mod users;
