use crate::server::ServerRouter;

mod posts;
mod replies;
mod upload;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .merge(posts::routes())
        .merge(replies::routes())
        .merge(upload::routes())
}
