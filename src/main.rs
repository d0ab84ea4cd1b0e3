use rocket::launch;

#[launch]
fn rocket() -> _ {
    env_logger::init();

    brewlog::create_rocket()
}
