use actix_web::dev::Server;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;

use crate::auth::TokenService;
use crate::configuration::ApplicationSettings;
use crate::email_client::Mailer;
use crate::routes::{health_check, home, login, refresh, register, verify, verify_email};
use crate::session_store::SessionStore;
use crate::user_store::{PermissionStore, RoleStore, UserStore};

/// Shared request state: the collaborator stores behind their narrow
/// contracts, the token service, and the application settings.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub roles: Arc<dyn RoleStore>,
    pub permissions: Arc<dyn PermissionStore>,
    pub mailer: Arc<dyn Mailer>,
    pub tokens: TokenService,
    pub application: ApplicationSettings,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        roles: Arc<dyn RoleStore>,
        permissions: Arc<dyn PermissionStore>,
        sessions: Arc<dyn SessionStore>,
        mailer: Arc<dyn Mailer>,
        jwt: crate::configuration::JwtSettings,
        application: ApplicationSettings,
    ) -> Self {
        Self {
            users,
            roles,
            permissions,
            mailer,
            tokens: TokenService::new(jwt, sessions),
            application,
        }
    }
}

pub fn run(listener: TcpListener, state: AppState) -> Result<Server, std::io::Error> {
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .route("/health_check", web::get().to(health_check))
            .route("/", web::get().to(home))
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(register))
                    .route("/login", web::post().to(login))
                    .route("/email_verification", web::get().to(verify_email))
                    .service(
                        web::scope("/token")
                            .route("/verify", web::post().to(verify))
                            .route("/refresh", web::post().to(refresh)),
                    ),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
