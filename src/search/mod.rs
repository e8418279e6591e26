// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

mod dijkstra;
mod error;

pub use dijkstra::shortest_path;
pub use error::{SearchError, DEFAULT_STEP_LIMIT};
