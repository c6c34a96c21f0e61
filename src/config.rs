// src/config.rs

use std::{env, time::Duration};

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        AssignmentRepository, BulletinRepository, DashboardRepository, PaymentRepository,
        RegistrationRepository, SchoolRepository, UserRepository,
    },
    services::{
        stripe::StripeGateway, AssignmentService, AuthService, BulletinService, DashboardService,
        PaymentService, RegistrationService, SchoolService, UserService,
    },
};

// Variáveis de ambiente já interpretadas, com os mesmos defaults que o
// front espera em desenvolvimento
#[derive(Debug, Clone)]
pub struct Env {
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub token_expires_in_days: i64,
    pub cors_origins: Vec<String>,
    pub stripe_secret_key: Option<String>,
    pub stripe_webhook_secret: Option<String>,
    pub wompi_webhook_secret: Option<String>,
    pub public_url: String,
}

impl Env {
    pub fn from_process() -> Self {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");
        if jwt_secret == "change-me" {
            tracing::warn!("JWT_SECRET fraco ou de exemplo; defina um segredo forte no .env");
        }

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(4000),
            database_url,
            jwt_secret,
            token_expires_in_days: env::var("TOKEN_EXPIRES_IN_DAYS")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(7),
            cors_origins: parse_list(env::var("CORS_ORIGIN").ok().as_deref())
                .unwrap_or_else(|| vec!["http://localhost:3000".to_string()]),
            stripe_secret_key: non_empty(env::var("STRIPE_SECRET_KEY").ok()),
            stripe_webhook_secret: non_empty(env::var("STRIPE_WEBHOOK_SECRET").ok()),
            wompi_webhook_secret: non_empty(env::var("WOMPI_WEBHOOK_SECRET").ok()),
            public_url: env::var("PUBLIC_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        }
    }
}

// "a, b ,c" -> ["a", "b", "c"]; lista vazia vira None para cair no default
fn parse_list(raw: Option<&str>) -> Option<Vec<String>> {
    let list: Vec<String> = raw?
        .split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect();

    if list.is_empty() {
        None
    } else {
        Some(list)
    }
}

// Chave ausente e chave em branco contam como "não configurado"
fn non_empty(raw: Option<String>) -> Option<String> {
    raw.filter(|value| !value.trim().is_empty())
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub env: Env,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub school_service: SchoolService,
    pub registration_service: RegistrationService,
    pub payment_service: PaymentService,
    pub assignment_service: AssignmentService,
    pub bulletin_service: BulletinService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    // A assinatura retorna um Result!
    pub async fn new() -> anyhow::Result<Self> {
        let env = Env::from_process();

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&env.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Self::assemble(env, db_pool)
    }

    // Montagem separada da conexão, para os testes injetarem o próprio pool
    pub fn assemble(env: Env, db_pool: PgPool) -> anyhow::Result<Self> {
        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let school_repo = SchoolRepository::new(db_pool.clone());
        let registration_repo = RegistrationRepository::new(db_pool.clone());
        let payment_repo = PaymentRepository::new(db_pool.clone());
        let assignment_repo = AssignmentRepository::new(db_pool.clone());
        let bulletin_repo = BulletinRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            env.jwt_secret.clone(),
            env.token_expires_in_days,
            db_pool.clone(),
        );
        let user_service = UserService::new(
            user_repo.clone(),
            school_repo.clone(),
            registration_repo.clone(),
            assignment_repo.clone(),
            db_pool.clone(),
        );
        let school_service = SchoolService::new(school_repo.clone());
        let registration_service = RegistrationService::new(
            registration_repo.clone(),
            school_repo,
            payment_repo.clone(),
            user_repo.clone(),
            db_pool.clone(),
        );

        // A pasarela só existe quando há chave configurada; sem ela o
        // checkout responde em modo simulado
        let stripe_gateway = match &env.stripe_secret_key {
            Some(key) => Some(StripeGateway::new(key.clone(), env.public_url.clone())?),
            None => None,
        };
        let payment_service = PaymentService::new(
            payment_repo,
            registration_repo,
            stripe_gateway,
            env.stripe_webhook_secret.clone(),
            env.wompi_webhook_secret.clone(),
            db_pool.clone(),
        );

        let assignment_service = AssignmentService::new(assignment_repo, user_repo, db_pool.clone());
        let bulletin_service = BulletinService::new(bulletin_repo);
        let dashboard_service = DashboardService::new(dashboard_repo);

        Ok(Self {
            db_pool,
            env,
            auth_service,
            user_service,
            school_service,
            registration_service,
            payment_service,
            assignment_service,
            bulletin_service,
            dashboard_service,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_parsing_trims_and_drops_blanks() {
        assert_eq!(
            parse_list(Some("http://a.com, http://b.com ,")),
            Some(vec!["http://a.com".to_string(), "http://b.com".to_string()])
        );
        assert_eq!(parse_list(Some("  ,  ")), None);
        assert_eq!(parse_list(None), None);
    }

    #[test]
    fn blank_keys_count_as_unconfigured() {
        assert_eq!(non_empty(Some("   ".to_string())), None);
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(
            non_empty(Some("sk_test_abc".to_string())),
            Some("sk_test_abc".to_string())
        );
        assert_eq!(non_empty(None), None);
    }
}
