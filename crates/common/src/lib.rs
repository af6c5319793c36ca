pub mod types;
pub mod utils;
pub mod env;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn envelope_omits_absent_parts() {
        let ok = serde_json::to_value(types::Envelope::data(vec![1, 2])).unwrap();
        assert_eq!(ok, json!({"status": "Success", "data": [1, 2]}));

        let failed = serde_json::to_value(types::Envelope::failure_with("bad", ["x"])).unwrap();
        assert_eq!(failed, json!({"status": "Failure", "message": "bad", "errors": ["x"]}));

        let msg = serde_json::to_value(types::Envelope::success("done")).unwrap();
        assert_eq!(msg, json!({"status": "Success", "message": "done"}));
    }
}
