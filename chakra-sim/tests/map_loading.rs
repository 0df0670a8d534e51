//! Loading ROS-style YAML + PGM maps into the simulator

use chakra_sim::map::SimulationMap;
use chakra_sim::{SimulationConfig, Simulator, StepResult, Wheel};

const BOX_ROOM: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/maps/box_room.yaml");

#[test]
fn test_load_box_room() {
    let map = SimulationMap::load(BOX_ROOM).unwrap();
    assert_eq!(map.width(), 100);
    assert_eq!(map.height(), 100);
    assert!((map.resolution() - 0.01).abs() < 1e-6);

    // Border walls and centre block are occupied, the rest is free
    assert!(map.is_occupied(0.005, 0.5));
    assert!(map.is_occupied(0.5, 0.5));
    assert!(!map.is_occupied(0.2, 0.2));
    assert!(!map.is_occupied(0.8, 0.8));
}

#[test]
fn test_missing_map_is_config_error() {
    let result = SimulationMap::load("/nonexistent/room.yaml");
    assert!(matches!(result, Err(chakra_sim::Error::Config(_))));
}

#[test]
fn test_simulator_on_loaded_map() {
    let config = SimulationConfig {
        map_file: Some(BOX_ROOM.to_string()),
        start_x: 0.5,
        start_y: 0.2,
        start_theta: std::f32::consts::FRAC_PI_2,
        ..Default::default()
    };
    let mut sim = Simulator::new(config).unwrap();

    // Drive north into the centre block
    sim.set_wheel_velocity(Wheel::Left, 6.28);
    sim.set_wheel_velocity(Wheel::Right, 6.28);
    let mut saw_block = false;
    for _ in 0..100 {
        assert_eq!(sim.step(0.064), StepResult::Continue);
        if sim.proximity_value(0) > 100.0 && sim.proximity_value(7) > 100.0 {
            saw_block = true;
            break;
        }
    }
    assert!(saw_block);
    let (_, y, _) = sim.pose();
    assert!(y < 0.45);
}
