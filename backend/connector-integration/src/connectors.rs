pub mod macros;

pub mod forte;
pub use self::forte::Forte;

pub mod nmi;
pub use self::nmi::Nmi;

pub mod worldpayxml;
pub use self::worldpayxml::Worldpayxml;

pub mod paysafe;
pub use self::paysafe::Paysafe;

pub mod globalpay;
pub use self::globalpay::Globalpay;
