//! FIX 4.4 tag numbers and message types used by the gateway.

/// BeginString for every session.
pub const FIX_44: &str = "FIX.4.4";

/// Header tags.
pub mod header {
    /// BeginString.
    pub const BEGIN_STRING: u32 = 8;
    /// BodyLength (framing, never produced).
    pub const BODY_LENGTH: u32 = 9;
    /// MsgType.
    pub const MSG_TYPE: u32 = 35;
    /// CheckSum (framing, never produced).
    pub const CHECK_SUM: u32 = 10;
}

/// Account.
pub const ACCOUNT: u32 = 1;
/// AvgPx.
pub const AVG_PX: u32 = 6;
/// ClOrdID.
pub const CL_ORD_ID: u32 = 11;
/// CumQty.
pub const CUM_QTY: u32 = 14;
/// Currency.
pub const CURRENCY: u32 = 15;
/// ExecID.
pub const EXEC_ID: u32 = 17;
/// OrderID.
pub const ORDER_ID: u32 = 37;
/// OrderQty.
pub const ORDER_QTY: u32 = 38;
/// OrdStatus.
pub const ORD_STATUS: u32 = 39;
/// OrdType.
pub const ORD_TYPE: u32 = 40;
/// OrigClOrdID.
pub const ORIG_CL_ORD_ID: u32 = 41;
/// Price.
pub const PRICE: u32 = 44;
/// Side.
pub const SIDE: u32 = 54;
/// Symbol.
pub const SYMBOL: u32 = 55;
/// Text.
pub const TEXT: u32 = 58;
/// TimeInForce.
pub const TIME_IN_FORCE: u32 = 59;
/// TransactTime.
pub const TRANSACT_TIME: u32 = 60;
/// CxlRejReason.
pub const CXL_REJ_REASON: u32 = 102;
/// ExecType.
pub const EXEC_TYPE: u32 = 150;
/// LeavesQty.
pub const LEAVES_QTY: u32 = 151;
/// CxlRejResponseTo.
pub const CXL_REJ_RESPONSE_TO: u32 = 434;
/// MarginExcess (custom margin update).
pub const MARGIN_EXCESS: u32 = 899;
/// MarginValue (custom margin update).
pub const MARGIN_VALUE: u32 = 20002;
/// MarginLevel (custom margin update, percent).
pub const MARGIN_LEVEL: u32 = 20003;

/// MsgType values.
pub mod msg_type {
    /// Execution report.
    pub const EXECUTION_REPORT: &str = "8";
    /// Order cancel reject.
    pub const ORDER_CANCEL_REJECT: &str = "9";
    /// New order single.
    pub const NEW_ORDER_SINGLE: &str = "D";
    /// Order cancel request.
    pub const ORDER_CANCEL_REQUEST: &str = "F";
    /// Order cancel/replace request.
    pub const ORDER_CANCEL_REPLACE_REQUEST: &str = "G";
    /// Custom margin update.
    pub const MARGIN_UPDATE: &str = "BI";
    /// Heartbeat.
    pub const HEARTBEAT: &str = "0";
    /// Logon.
    pub const LOGON: &str = "A";
    /// Logout.
    pub const LOGOUT: &str = "5";
}

/// CxlRejReason "Other".
pub const CXL_REJ_REASON_OTHER: &str = "99";
