//! API request handlers

use super::{responses::*, ApiState};
use axum::{
    extract::{
        multipart::{Field, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    response::Json,
};
use coinforge_core::{
    validate_server_submission, ImageUpload, LaunchError, LaunchResult, TokenForm,
    ValidationError,
};
use tracing::{error, info};

/// `POST /create-coin`; every failure, including a body that is not
/// multipart, answers 400 with the JSON failure body
pub async fn create_coin(
    State(state): State<ApiState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> (StatusCode, Json<CreateCoinResponse>) {
    let result = match multipart {
        Ok(multipart) => handle_create_coin(&state, multipart).await,
        Err(rejection) => Err(LaunchError::Http(rejection.body_text())),
    };

    match result {
        Ok(response) => (StatusCode::OK, Json(response)),
        Err(e) => {
            error!("Error creating token: {}", e);
            (
                StatusCode::BAD_REQUEST,
                Json(CreateCoinResponse::failure(e.to_string())),
            )
        }
    }
}

async fn handle_create_coin(
    state: &ApiState,
    multipart: Multipart,
) -> LaunchResult<CreateCoinResponse> {
    let form = read_form(multipart).await?;
    let token = validate_server_submission(&form)?;
    let owner = token
        .wallet
        .ok_or(ValidationError::MissingField("walletAddress"))?;

    let image_url = match &form.image {
        Some(image) => {
            state.image_constraints.check(&image.bytes)?;
            Some(state.uploads.save(image).await?.public_url)
        }
        None => None,
    };

    info!(
        "Creating token {} ({}) for {}",
        token.name, token.symbol, owner
    );
    let outcome = state
        .mint_service
        .create_token(&token, form.image.clone())
        .await?;
    info!("Token created: {}", outcome.mint);

    Ok(CreateCoinResponse::success(
        outcome.mint.to_string(),
        TokenDetails {
            token_name: token.name,
            token_symbol: token.symbol,
            decimals: token.decimals,
            total_supply: token.supply,
            description: token.description,
            image_url,
            socials: token.socials,
        },
    ))
}

/// Collect the multipart body into a [`TokenForm`]; unknown parts are ignored
async fn read_form(mut multipart: Multipart) -> LaunchResult<TokenForm> {
    let mut form = TokenForm::default();

    while let Some(field) = multipart.next_field().await.map_err(bad_body)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "image" {
            form.image = read_image(field).await?;
            continue;
        }

        let value = field.text().await.map_err(bad_body)?;
        match name.as_str() {
            "tokenName" => form.token_name = Some(value),
            "tokenSymbol" => form.token_symbol = Some(value),
            "decimals" => form.decimals = Some(value),
            "supply" => form.supply = Some(value),
            "description" => form.description = Some(value),
            "walletAddress" => form.wallet_address = Some(value),
            "website" => form.website = Some(value),
            "x" => form.x = Some(value),
            "telegram" => form.telegram = Some(value),
            "youtube" => form.youtube = Some(value),
            "revokeMintAuthority" => form.revoke_mint_authority = value == "true",
            "revokeFreezeAuthority" => form.revoke_freeze_authority = value == "true",
            _ => {}
        }
    }

    Ok(form)
}

async fn read_image(field: Field<'_>) -> LaunchResult<Option<ImageUpload>> {
    let file_name = field.file_name().unwrap_or("upload").to_string();
    let content_type = field.content_type().map(str::to_string);
    let bytes = field.bytes().await.map_err(bad_body)?;
    if bytes.is_empty() {
        return Ok(None);
    }

    let mut upload = ImageUpload::new(file_name, bytes.to_vec());
    if let Some(content_type) = content_type {
        upload = upload.with_content_type(content_type);
    }
    Ok(Some(upload))
}

fn bad_body(err: axum::extract::multipart::MultipartError) -> LaunchError {
    LaunchError::Http(err.body_text())
}

/// `GET /health`
pub async fn health(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "coinforge-server".to_string(),
        payer: state.mint_service.payer().to_string(),
        rpc_url: state.mint_service.rpc().url(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}
