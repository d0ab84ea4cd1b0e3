use log::{info, warn};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::{Request, Response};

/// Logs one line per answered request: method, path, status, user agent
pub struct RequestLogger;

#[rocket::async_trait]
impl Fairing for RequestLogger {
    fn info(&self) -> Info {
        Info {
            name: "Request Logger",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, req: &'r Request<'_>, res: &mut Response<'r>) {
        let status = res.status();
        let agent = req.headers().get_one("User-Agent").unwrap_or("Unknown");

        if status.code >= 500 {
            warn!("{} {} -> {} {}", req.method(), req.uri(), status, agent);
        } else {
            info!("{} {} -> {} {}", req.method(), req.uri(), status, agent);
        }
    }
}
