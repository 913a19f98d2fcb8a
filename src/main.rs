use rocket::{Build, Rocket, launch};

#[launch]
fn rocket() -> Rocket<Build> {
    let rocket = vehicle_explorer_api::rocket();
    log::info!("Starting Vehicle Explorer API Server");
    rocket
}
