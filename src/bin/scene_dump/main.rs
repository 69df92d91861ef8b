// scene-dump - build a test scene against the recording device and print
// the committed graph.
//
// Usage: cargo run --bin scene-dump -- [scene] [--ops]
//
//   scene   name of the scene to build (default: textured_cube)
//   --ops   additionally print the full operation log in call order

use std::env;
use std::sync::Arc;

use scene_rig::device::record::{ArrayRecord, RecordingDevice};
use scene_rig::device::Device;
use scene_rig::scenes;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut scene_name = "textured_cube".to_string();
    let mut print_ops = false;
    for arg in &args[1..] {
        match arg.as_str() {
            "--ops" => print_ops = true,
            "--help" | "-h" => {
                eprintln!("Usage: {} [scene] [--ops]", args[0]);
                eprintln!("Known scenes: {}", scenes::scene_names().join(", "));
                return Ok(());
            }
            name => scene_name = name.to_string(),
        }
    }

    let device = Arc::new(RecordingDevice::new());
    let mut scene = scenes::scene(&scene_name, device.clone() as Arc<dyn Device>)?;
    scene.commit();

    println!("scene {scene_name:?}, world = {:?}", scene.world());
    println!();

    for handle in device.handles() {
        let record = device
            .object(handle)
            .expect("handle listed by the device it came from");
        let subtype = record
            .subtype
            .map(|s| format!(" {s:?}"))
            .unwrap_or_default();
        println!(
            "[{:>3}] {:?}{subtype} (committed {}x, caller refs {})",
            handle.0, record.kind, record.committed, record.caller_refs
        );
        if let Some(array) = record.array {
            match array {
                ArrayRecord::Data {
                    bytes,
                    element,
                    dims,
                } => println!(
                    "      {element:?} {}x{} ({} bytes)",
                    dims.0,
                    dims.1,
                    bytes.len()
                ),
                ArrayRecord::Handles { element, handles } => {
                    println!("      {element:?} x{}: {handles:?}", handles.len())
                }
            }
        }
        for (name, value) in record.params {
            println!("      {name} = {value:?}");
        }
    }

    println!();
    for camera in scene.cameras() {
        println!(
            "camera at {:?} looking at {:?} (direction {:?}, up {:?})",
            camera.position, camera.at, camera.direction, camera.up
        );
    }

    if print_ops {
        println!();
        for (index, op) in device.ops().iter().enumerate() {
            println!("{index:>4}: {op:?}");
        }
    }

    Ok(())
}
