use crate::core::errors::ApiError;
use crate::core::traits::ApiRequest;
use crate::core::types::{flatten_params, Params, RequestMethod, ResultResponse};
use serde::Serialize;
use serde_json::Value;

pub const IP_INFO_PATH: &str = "/ipInfo";

/// Request against any gateway endpoint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenericRequest {
    method: String,
    path: String,
    params: Params,
}

impl GenericRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            params: Params::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(RequestMethod::Get.as_str(), path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(RequestMethod::Post.as_str(), path)
    }

    /// Replace the parameters with the flattened fields of `params`
    pub fn with_params<T: Serialize + ?Sized>(mut self, params: &T) -> Result<Self, ApiError> {
        self.params = flatten_params(params)?;
        Ok(self)
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

impl ApiRequest for GenericRequest {
    type Response = ResultResponse;

    fn method(&self) -> &str {
        &self.method
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn params(&self) -> &Params {
        &self.params
    }
}

/// IP geolocation lookup, always `GET /ipInfo`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IpInfoRequest {
    params: Params,
}

impl IpInfoRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params<T: Serialize + ?Sized>(mut self, params: &T) -> Result<Self, ApiError> {
        self.params = flatten_params(params)?;
        Ok(self)
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

impl ApiRequest for IpInfoRequest {
    type Response = ResultResponse;

    fn method(&self) -> &str {
        RequestMethod::Get.as_str()
    }

    fn path(&self) -> &str {
        IP_INFO_PATH
    }

    fn params(&self) -> &Params {
        &self.params
    }
}

/// Currency endpoints; method and path are chosen by the caller
/// (e.g. `GET /currency/exchange`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrencyRequest {
    method: String,
    path: String,
    params: Params,
}

impl CurrencyRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_method(&mut self, method: impl Into<String>) -> &mut Self {
        self.method = method.into();
        self
    }

    pub fn set_path(&mut self, path: impl Into<String>) -> &mut Self {
        self.path = path.into();
        self
    }

    pub fn set_params<T: Serialize + ?Sized>(&mut self, params: &T) -> Result<&mut Self, ApiError> {
        self.params = flatten_params(params)?;
        Ok(self)
    }
}

impl ApiRequest for CurrencyRequest {
    type Response = ResultResponse;

    fn method(&self) -> &str {
        &self.method
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn params(&self) -> &Params {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ip_info_request_is_fixed_get() {
        let request = IpInfoRequest::new().with_param("ip", "1.1.1.1");
        assert_eq!(request.method(), "GET");
        assert_eq!(request.path(), "/ipInfo");
        assert_eq!(request.params()["ip"], json!("1.1.1.1"));
    }

    #[test]
    fn test_currency_request_setters_chain() {
        #[derive(Serialize)]
        struct Exchange<'a> {
            from: &'a str,
            to: &'a str,
        }

        let mut request = CurrencyRequest::new();
        request
            .set_method("post")
            .set_path("/currency/exchange")
            .set_params(&Exchange { from: "USD", to: "CNY" })
            .unwrap();

        assert_eq!(request.method(), "post");
        assert_eq!(request.path(), "/currency/exchange");
        assert_eq!(request.params()["to"], json!("CNY"));
    }

    #[test]
    fn test_generic_request_params() {
        let request = GenericRequest::get("/name")
            .with_params(&json!({"name": "ylx", "age": null}))
            .unwrap()
            .with_param("page", 2);

        assert_eq!(request.method(), "GET");
        assert_eq!(request.params().len(), 2);
        assert!(request.new_response().unwrap().is_empty());
    }
}
