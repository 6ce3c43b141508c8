#[derive(Debug, Clone)]
pub struct Authorize;

#[derive(Debug, Clone)]
pub struct Capture;

#[derive(Debug, Clone)]
pub struct Void;

#[derive(Debug, Clone)]
pub struct Refund;

/// Exchanges an instrument for a single use gateway token.
#[derive(Debug, Clone)]
pub struct PaymentMethodToken;

#[derive(Debug, Clone)]
pub struct Store;

#[derive(Debug, Clone)]
pub struct Unstore;

/// Zero or nominal amount card check, for gateways with a native verify call.
#[derive(Debug, Clone)]
pub struct Verify;

#[derive(Debug, Clone)]
pub struct CreateAccessToken;
