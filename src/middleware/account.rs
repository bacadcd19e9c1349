// src/middleware/account.rs

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
};

use crate::common::error::AppError;

// O nome do nosso cabeçalho HTTP customizado
const ACCOUNT_ID_HEADER: &str = "x-pos-account-id";

// Extrator do account id (pos_accnt_id) que escopa todas as queries.
// Toda rota de dados exige este cabeçalho — não existe acesso
// cross-tenant.
#[derive(Debug, Clone, Copy)]
pub struct AccountContext(pub i64);

impl<S> FromRequestParts<S> for AccountContext
where
    S: Send + Sync,
{
    // AppError já implementa IntoResponse com o envelope de erro.
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts.headers.get(ACCOUNT_ID_HEADER).ok_or_else(|| {
            AppError::InvalidParam("O cabeçalho X-Pos-Account-Id é obrigatório.".to_string())
        })?;

        let value_str = header_value.to_str().map_err(|_| {
            AppError::InvalidParam(
                "Cabeçalho X-Pos-Account-Id contém caracteres inválidos.".to_string(),
            )
        })?;

        let account_id: i64 = value_str.parse().map_err(|_| {
            AppError::InvalidParam(
                "Cabeçalho X-Pos-Account-Id inválido (não é um inteiro).".to_string(),
            )
        })?;

        if account_id <= 0 {
            return Err(AppError::InvalidParam(
                "Cabeçalho X-Pos-Account-Id deve ser positivo.".to_string(),
            ));
        }

        Ok(AccountContext(account_id))
    }
}
