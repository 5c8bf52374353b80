use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use primitives::jsonrpc::{ErrorPayload, Id, Request, Response, ResponsePayload};
use primitives::{Address, HexBytes, HexInteger};
use rpc_client::call;
use transaction::Transaction;
use wallet::WalletApi;

use crate::error::RpcError;
use crate::state::GatewayState;

/// `eth_sendTransaction` / `eth_signTransaction` share this parameter
/// shape; any field the caller omits is resolved (`nonce`) or defaulted
/// to zero/empty before signing.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct TxParams {
    from: Option<Address>,
    #[serde(default)]
    nonce: Option<HexInteger>,
    #[serde(default, rename = "gasPrice")]
    gas_price: Option<HexInteger>,
    #[serde(default, rename = "maxPriorityFeePerGas")]
    max_priority_fee_per_gas: Option<HexInteger>,
    #[serde(default, rename = "maxFeePerGas")]
    max_fee_per_gas: Option<HexInteger>,
    #[serde(default)]
    gas: Option<HexInteger>,
    #[serde(default)]
    to: Option<Address>,
    #[serde(default)]
    value: Option<HexInteger>,
    #[serde(default)]
    data: Option<HexBytes>,
}

fn build_transaction(params: &TxParams) -> Transaction {
    Transaction {
        nonce: params.nonce.clone().unwrap_or(HexInteger::ZERO),
        gas_price: params.gas_price.clone().unwrap_or(HexInteger::ZERO),
        max_priority_fee_per_gas: params.max_priority_fee_per_gas.clone().unwrap_or(HexInteger::ZERO),
        max_fee_per_gas: params.max_fee_per_gas.clone().unwrap_or(HexInteger::ZERO),
        gas_limit: params.gas.clone().unwrap_or(HexInteger::ZERO),
        to: params.to,
        value: params.value.clone().unwrap_or(HexInteger::ZERO),
        data: params.data.clone().unwrap_or_default(),
    }
}

/// Dispatches one JSON-RPC request: intercepted methods are served
/// locally, everything else is forwarded to the upstream backend
/// verbatim. Always returns a fully-populated response.
pub async fn handle_request(state: &GatewayState, request: Request, cancellation: &CancellationToken) -> Response {
    if request.id.is_none() {
        return Response::error(Id::None, ErrorPayload::new(ErrorPayload::INVALID_REQUEST, "missing id"));
    }

    let id = request.id.clone();
    let method = request.method.clone();

    if !matches!(
        method.as_str(),
        "eth_accounts" | "personal_accounts" | "eth_sendTransaction" | "eth_signTransaction" | "personal_sign"
    ) {
        return state.backend.sync_request(request, cancellation).await;
    }

    let result = match method.as_str() {
        "eth_accounts" | "personal_accounts" => handle_accounts(state),
        "eth_sendTransaction" => handle_send_transaction(state, &request.params, cancellation).await,
        "eth_signTransaction" => handle_sign_transaction(state, &request.params, cancellation).await,
        "personal_sign" => handle_personal_sign(state, &request.params),
        _ => unreachable!("filtered by the match guard above"),
    };

    match result {
        Ok(value) => Response::success(id, value),
        Err(e) => {
            tracing::error!(%method, error = %e, "request failed");
            Response::error(id, e.to_error_payload())
        }
    }
}

fn handle_accounts(state: &GatewayState) -> Result<Value, RpcError> {
    let checksums: Vec<String> = state.wallet.address_list().iter().map(|a| a.to_checksum()).collect();
    Ok(serde_json::to_value(checksums).expect("Vec<String> always serializes"))
}

fn parse_tx_params(params: &Value, method: &str) -> Result<TxParams, RpcError> {
    let array = params
        .as_array()
        .filter(|a| !a.is_empty())
        .ok_or_else(|| RpcError::InvalidRequest(format!("{method} requires at least one param")))?;

    serde_json::from_value(array[0].clone()).map_err(|e| RpcError::ParseError(e.to_string()))
}

/// Resolves the signer and nonce shared by `eth_sendTransaction` and
/// `eth_signTransaction`, then signs. Does not forward anything upstream.
async fn resolve_and_sign(
    state: &GatewayState,
    mut tx_params: TxParams,
    cancellation: &CancellationToken,
) -> Result<(Address, transaction::SignedTransaction, TxParams), RpcError> {
    let from = tx_params
        .from
        .ok_or_else(|| RpcError::InvalidRequest("missing `from`".to_string()))?;

    if tx_params.nonce.is_none() {
        let nonce: HexInteger = call(
            state.backend.as_ref(),
            "eth_getTransactionCount",
            (from.to_string(), "pending"),
            cancellation,
        )
        .await?;
        tx_params.nonce = Some(nonce);
    }

    let tx = build_transaction(&tx_params);
    let key_pair = state.wallet.get_signer(&from)?;
    let signed = transaction::sign(&tx, &key_pair, state.chain_id)?;

    Ok((from, signed, tx_params))
}

/// §4.8.1: resolve nonce, sign, rewrite as `eth_sendRawTransaction`,
/// forward, and return the upstream response verbatim.
async fn handle_send_transaction(
    state: &GatewayState,
    params: &Value,
    cancellation: &CancellationToken,
) -> Result<Value, RpcError> {
    let tx_params = parse_tx_params(params, "eth_sendTransaction")?;
    let (_from, signed, _tx_params) = resolve_and_sign(state, tx_params, cancellation).await?;

    let raw_hex = format!("0x{}", hex::encode(&signed.raw));
    let forward = Request::new(Id::None, "eth_sendRawTransaction", serde_json::json!([raw_hex]));
    let response = state.backend.sync_request(forward, cancellation).await;

    match response.payload {
        ResponsePayload::Success(value) => Ok(value),
        ResponsePayload::Error(err) => Err(RpcError::RpcClient(rpc_client::RpcClientError::Upstream {
            code: err.code,
            message: err.message,
        })),
    }
}

/// §9b: identical signing path, no upstream round-trip — the signed
/// bytes are returned directly to the caller.
async fn handle_sign_transaction(
    state: &GatewayState,
    params: &Value,
    cancellation: &CancellationToken,
) -> Result<Value, RpcError> {
    let tx_params = parse_tx_params(params, "eth_signTransaction")?;
    let (_from, signed, tx_params) = resolve_and_sign(state, tx_params, cancellation).await?;

    let raw_hex = format!("0x{}", hex::encode(&signed.raw));
    Ok(serde_json::json!({ "raw": raw_hex, "tx": tx_params }))
}

/// §9a: `[message, address]` → EIP-191 signature, no upstream round-trip.
fn handle_personal_sign(state: &GatewayState, params: &Value) -> Result<Value, RpcError> {
    let array = params
        .as_array()
        .filter(|a| a.len() >= 2)
        .ok_or_else(|| RpcError::InvalidRequest("personal_sign requires [message, address]".to_string()))?;

    let message_hex: String =
        serde_json::from_value(array[0].clone()).map_err(|e| RpcError::ParseError(e.to_string()))?;
    let message = HexBytes::parse(&message_hex).map_err(|e| RpcError::ParseError(e.to_string()))?;

    let address_str: String =
        serde_json::from_value(array[1].clone()).map_err(|e| RpcError::ParseError(e.to_string()))?;
    let address = Address::parse(&address_str).map_err(|e| RpcError::InvalidRequest(format!("bad address: {e}")))?;

    let key_pair = state.wallet.get_signer(&address)?;
    let signature = signer::sign_personal_message(&key_pair, message.as_slice())?;

    Ok(Value::String(format!("0x{}", hex::encode(signature))))
}
