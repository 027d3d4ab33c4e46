//! Orbit Demo
//!
//! Drives a scene graph the way a world's update step does:
//! - Builds a hierarchy from a RON scene description (or a built-in one)
//! - Spins every node around its local Y axis each frame
//! - Pushes externally simulated placement for "simulated" nodes
//! - Drains the change feed once per frame, then clears it

mod scene;

use scene::{DemoError, FrameDriver, SceneDescription};
use scene_graph::config::Config;

fn main() -> Result<(), DemoError> {
    scene_graph::foundation::logging::init();

    let description = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading scene description from {path}");
            SceneDescription::load_from_file(&path)?
        }
        None => SceneDescription::default(),
    };

    let mut driver = FrameDriver::new(&description)?;
    log::info!("Scene ready with {} nodes", driver.graph().num_nodes());

    for frame in 0..description.frames {
        let report = driver.step();
        if frame % 60 == 0 {
            let names: Vec<_> = driver
                .last_changed()
                .iter()
                .filter_map(|&unit| driver.name(unit))
                .collect();
            log::info!(
                "Frame {frame}: {} changed [{}], {} at {:?}",
                report.changed,
                names.join(", "),
                report.first_name.as_deref().unwrap_or("-"),
                report.first_position
            );
        }
    }

    driver.graph().validate()?;
    log::info!("Finished {} frames", description.frames);
    Ok(())
}
