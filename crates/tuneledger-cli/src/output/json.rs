use serde::Serialize;
use serde_json::{json, Value};

use tuneledger_core::{AnyRecord, Pubkey};

/// `{"address": ..., "kind": ..., "record": {...}}`
pub fn record_json(address: &Pubkey, record: &AnyRecord) -> anyhow::Result<Value> {
    let mut value = serde_json::to_value(record)?;
    if let Value::Object(map) = &mut value {
        map.insert("address".to_string(), json!(address.to_string()));
    }
    Ok(value)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
