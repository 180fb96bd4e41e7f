//! Behaviour-driven step definitions driving the plan CLI scenarios.

use super::helpers::{StubPlannerBuilder, TEST_KEY, sample_request, utf8_tempdir, write_utf8};
use super::*;
use crate::plan::run_plan_with;
use camino::Utf8PathBuf;
use clap::Parser;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use storyroute_core::{PlanError, PlanOutcome, PlanRequest, RoutingError, ValidationError};
use tempfile::TempDir;

#[derive(Debug)]
struct PlanWorld {
    _tmp: TempDir,
    request_path: Utf8PathBuf,
    include_request: RefCell<bool>,
    cli_args: RefCell<Vec<String>>,
    builder: RefCell<StubPlannerBuilder>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl PlanWorld {
    fn new() -> Self {
        let (tmp, root) = utf8_tempdir();
        let request_path = root.join("request.json");

        Self {
            _tmp: tmp,
            request_path,
            include_request: RefCell::new(true),
            cli_args: RefCell::new(Vec::new()),
            builder: RefCell::new(StubPlannerBuilder::succeeding()),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn write_request(&self, request: &PlanRequest) {
        let payload = serde_json::to_string_pretty(request).expect("serialize request");
        write_utf8(&self.request_path, payload.as_bytes());
    }

    fn build_command_line(&self) -> Vec<String> {
        let mut argv = vec!["storyroute".to_string(), "plan".to_string()];
        if *self.include_request.borrow() {
            argv.push(self.request_path.as_str().to_string());
        }
        argv.extend([format!("--{ARG_PLAN_AMAP_KEY}"), TEST_KEY.to_string()]);
        argv.extend(self.cli_args.borrow().iter().cloned());
        argv
    }

    fn error(&self) -> std::cell::Ref<'_, CliError> {
        std::cell::Ref::map(self.result.borrow(), |result| {
            result
                .as_ref()
                .expect("result recorded")
                .as_ref()
                .expect_err("expected error")
        })
    }
}

#[fixture]
fn world() -> PlanWorld {
    PlanWorld::new()
}

#[given("a valid plan request exists on disk")]
fn valid_plan_request_exists(#[from(world)] world: &PlanWorld) {
    world.write_request(&sample_request());
}

#[given("the plan request contains invalid JSON")]
fn plan_request_contains_invalid_json(#[from(world)] world: &PlanWorld) {
    write_utf8(&world.request_path, b"{ not valid json");
}

#[given("the plan request has no points")]
fn plan_request_has_no_points(#[from(world)] world: &PlanWorld) {
    let request = PlanRequest {
        point_ids: Vec::new(),
        ..sample_request()
    };
    world.write_request(&request);
}

#[given("I omit the plan request path")]
fn omit_plan_request_path(#[from(world)] world: &PlanWorld) {
    *world.include_request.borrow_mut() = false;
}

#[given("a plan request naming an unknown point exists on disk")]
fn plan_request_with_unknown_point(#[from(world)] world: &PlanWorld) {
    let request = PlanRequest {
        point_ids: vec![1, 42],
        ..sample_request()
    };
    world.write_request(&request);
}

#[given("I pass the strict flag")]
fn pass_strict_flag(#[from(world)] world: &PlanWorld) {
    world
        .cli_args
        .borrow_mut()
        .push(format!("--{ARG_PLAN_STRICT}"));
}

#[given("the routing service rejects every leg")]
fn routing_service_rejects_every_leg(#[from(world)] world: &PlanWorld) {
    world.builder.replace(StubPlannerBuilder::rejecting());
}

#[when("I run the plan command")]
fn run_plan_command(#[from(world)] world: &PlanWorld) {
    let invocation = world.build_command_line();
    let parsed = Cli::try_parse_from(invocation).map_err(CliError::from);
    let outcome = parsed.and_then(|cli| match cli.command {
        Command::Plan(args) => {
            let builder = world.builder.borrow();
            let mut buffer = world.stdout.borrow_mut();
            run_plan_with(args, &*builder, &mut *buffer)
        }
    });

    world.result.replace(Some(outcome));
}

#[then("the command succeeds and prints the plan as JSON")]
fn command_succeeds_and_prints_json(#[from(world)] world: &PlanWorld) {
    let borrowed = world.result.borrow();
    let result = borrowed.as_ref().expect("result recorded");
    result.as_ref().expect("expected success");

    let stdout = String::from_utf8(world.stdout.borrow().clone()).expect("stdout utf-8");
    let outcome: PlanOutcome =
        serde_json::from_str(&stdout).expect("output should be a JSON plan outcome");
    let ids: Vec<u64> = outcome.points.iter().map(|point| point.id).collect();
    assert_eq!(ids, vec![1, 3, 4]);
    assert_eq!(outcome.plan.legs.len(), 3);
    assert_eq!(outcome.plan.total_distance_m, 3000.0);
    assert_eq!(outcome.plan.stages.len(), 3);
}

#[then("the command fails because the request JSON is invalid")]
fn command_fails_invalid_json(#[from(world)] world: &PlanWorld) {
    match &*world.error() {
        CliError::ParsePlanRequest { .. } => {}
        other => panic!("expected ParsePlanRequest, found {other:?}"),
    }
}

#[then("the command fails because the request is invalid")]
fn command_fails_invalid_request(#[from(world)] world: &PlanWorld) {
    match &*world.error() {
        CliError::InvalidPlanRequest { source, .. } => {
            assert_eq!(*source, ValidationError::EmptyPointIds);
        }
        other => panic!("expected InvalidPlanRequest, found {other:?}"),
    }
}

#[then("the command fails because the request path is missing")]
fn command_fails_missing_request_path(#[from(world)] world: &PlanWorld) {
    match &*world.error() {
        CliError::MissingArgument { field, .. } => assert_eq!(*field, ARG_PLAN_REQUEST),
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[then("the command fails because a point was not found")]
fn command_fails_not_found(#[from(world)] world: &PlanWorld) {
    match &*world.error() {
        CliError::Plan {
            source: PlanError::NotFound { ids },
        } => assert_eq!(ids, &vec![42]),
        other => panic!("expected Plan(NotFound), found {other:?}"),
    }
    assert!(world.stdout.borrow().is_empty());
}

#[then("the command fails because the provider rejected a leg")]
fn command_fails_provider_rejected(#[from(world)] world: &PlanWorld) {
    match &*world.error() {
        CliError::Plan {
            source: PlanError::Provider(RoutingError::ServiceError { code, .. }),
        } => assert_eq!(code, "10001"),
        other => panic!("expected Plan(Provider(ServiceError)), found {other:?}"),
    }
    assert!(world.stdout.borrow().is_empty());
}

macro_rules! register_plan_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/plan_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: PlanWorld) {
            let _ = world;
        }
    };
}

register_plan_scenario!(plan_happy_path, "planning a request from JSON");
register_plan_scenario!(plan_invalid_json, "rejecting invalid JSON input");
register_plan_scenario!(plan_invalid_request, "rejecting invalid plan requests");
register_plan_scenario!(plan_missing_request, "rejecting missing request paths");
register_plan_scenario!(plan_strict_not_found, "rejecting unknown points in strict mode");
register_plan_scenario!(plan_provider_rejected, "reporting legs the routing service rejects");
