// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

pub mod category;
pub mod provider;

pub use category::*;
pub use provider::*;
