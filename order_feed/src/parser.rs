use std::str::FromStr;

use limit_book::{Order, OrderType, Side};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("empty input")]
    Empty,

    #[error("unrecognized input format")]
    UnknownFormat,

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` has invalid value `{value}`")]
    InvalidValue { field: &'static str, value: String },

    #[error("unknown order type `{0}`")]
    UnknownOrderType(String),

    #[error("unknown side `{0}`")]
    UnknownSide(String),

    #[error("parsed order is invalid: {0}")]
    InvalidOrder(String),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse one order record, sniffing the format: `{...}` is JSON, a line
/// containing commas is CSV, a line containing pipes is pipe-delimited.
pub fn parse(input: &str) -> Result<Order, ParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseError::Empty);
    }

    if input.starts_with('{') && input.ends_with('}') {
        return parse_json(input);
    }
    if input.contains(',') {
        return parse_csv(input);
    }
    if input.contains('|') {
        return parse_pipe(input);
    }

    Err(ParseError::UnknownFormat)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonOrder {
    order_id: u64,
    #[serde(default)]
    client_id: u64,
    symbol: String,
    #[serde(rename = "type")]
    order_type: String,
    side: String,
    #[serde(default)]
    price: Decimal,
    quantity: u32,
    #[serde(default)]
    remaining_qty: Option<u32>,
    #[serde(default)]
    stop_price: Decimal,
}

pub fn parse_json(input: &str) -> Result<Order, ParseError> {
    let raw: JsonOrder = serde_json::from_str(input)?;

    let mut order = Order::with_stop(
        raw.order_id,
        raw.client_id,
        raw.symbol,
        order_type_from(&raw.order_type)?,
        side_from(&raw.side)?,
        raw.price,
        raw.quantity,
        raw.stop_price,
    );
    if let Some(remaining) = raw.remaining_qty {
        order.remaining_qty = remaining;
    }

    validated(order)
}

/// `orderId, symbol, type, side, price, quantity [, clientId [, remainingQty
/// [, stopPrice]]]`
pub fn parse_csv(input: &str) -> Result<Order, ParseError> {
    let fields: Vec<&str> = input.split(',').map(str::trim).collect();
    let mut order = order_from_fields(&fields)?;

    if let Some(&raw) = fields.get(6) {
        order.client_id = field::<u64>("clientId", raw)?;
    }
    if let Some(&raw) = fields.get(7) {
        order.remaining_qty = field::<u32>("remainingQty", raw)?;
    }
    if let Some(&raw) = fields.get(8) {
        order.stop_price = field::<Decimal>("stopPrice", raw)?;
    }

    validated(order)
}

/// `orderId|symbol|type|side|price|quantity` — exactly six fields carry
/// data; anything past them is ignored, and there is no optional tail.
pub fn parse_pipe(input: &str) -> Result<Order, ParseError> {
    let fields: Vec<&str> = input.split('|').map(str::trim).collect();
    let order = order_from_fields(&fields)?;
    validated(order)
}

fn order_from_fields(fields: &[&str]) -> Result<Order, ParseError> {
    if fields.len() < 6 {
        return Err(ParseError::MissingField("quantity"));
    }

    Ok(Order::new(
        field::<u64>("orderId", fields[0])?,
        0,
        fields[1].to_string(),
        order_type_from(fields[2])?,
        side_from(fields[3])?,
        field::<Decimal>("price", fields[4])?,
        field::<u32>("quantity", fields[5])?,
    ))
}

fn field<T: FromStr>(name: &'static str, raw: &str) -> Result<T, ParseError> {
    raw.parse().map_err(|_| ParseError::InvalidValue {
        field: name,
        value: raw.to_string(),
    })
}

// Wire strings are upper-cased before lookup.
fn order_type_from(raw: &str) -> Result<OrderType, ParseError> {
    match raw.to_uppercase().as_str() {
        "MARKET" => Ok(OrderType::Market),
        "LIMIT" => Ok(OrderType::Limit),
        "STOP" => Ok(OrderType::Stop),
        "STOP_LIMIT" => Ok(OrderType::StopLimit),
        "CANCEL" => Ok(OrderType::Cancel),
        "MODIFY" => Ok(OrderType::Modify),
        _ => Err(ParseError::UnknownOrderType(raw.to_string())),
    }
}

fn side_from(raw: &str) -> Result<Side, ParseError> {
    match raw.to_uppercase().as_str() {
        "BUY" => Ok(Side::Buy),
        "SELL" => Ok(Side::Sell),
        _ => Err(ParseError::UnknownSide(raw.to_string())),
    }
}

fn validated(order: Order) -> Result<Order, ParseError> {
    if !order.is_valid() {
        return Err(ParseError::InvalidOrder(order.to_string()));
    }
    Ok(order)
}
