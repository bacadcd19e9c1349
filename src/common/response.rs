use serde::Serialize;
use utoipa::ToSchema;

// Envelope padrão das respostas de sucesso: { "success": true, "data": ... }
// O caso de falha é montado pelo IntoResponse do AppError.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data }
    }
}
