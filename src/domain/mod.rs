// 領域層：純資料模型與介面（ports），不依賴具體 I/O
pub mod model;
pub mod ports;
