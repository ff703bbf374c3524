use splanner_core::{
    models::{MotorPort, Point},
    params::CreatePlan,
    session::{PlanCommand, SessionBuilder},
    PlanSession,
};
use tempfile::TempDir;

/// Parameters for a Spike-compatible test plan.
pub fn create_params(name: &str) -> CreatePlan {
    CreatePlan {
        name: name.to_string(),
        left_motor_port: MotorPort::A,
        right_motor_port: MotorPort::B,
        wheel_diameter: 56.0,
        axle_track: 112.0,
        hub_type: None,
        first_run: None,
    }
}

/// Helper function to create a test session whose plan file lives in a
/// temporary directory
pub async fn create_test_session() -> (TempDir, PlanSession) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let plan_path = temp_dir.path().join("test.pysplan");
    let session = SessionBuilder::new()
        .with_new_plan(create_params("Integration"))
        .with_plan_file(&plan_path)
        .build()
        .await
        .expect("Failed to create session");
    (temp_dir, session)
}

/// Appends a run with the given waypoints.
pub fn add_run(session: &mut PlanSession, name: &str, points: &[(f64, f64)]) -> usize {
    let run = session
        .apply(PlanCommand::CreateRun {
            name: name.to_string(),
        })
        .expect("Failed to create run")
        .active_run
        .expect("new run is active");
    for &(x, y) in points {
        session
            .apply(PlanCommand::AddPoint {
                run,
                point: Point::new(x, y).expect("finite point"),
            })
            .expect("Failed to add point");
    }
    run
}
