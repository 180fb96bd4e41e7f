//! Shared test harness modules for the storyroute CLI.

use super::*;

mod helpers;
mod plan_steps;
