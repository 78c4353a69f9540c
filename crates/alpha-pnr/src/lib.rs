//! # alpha-pnr: UniFire PNR tool
//!
//! Ordered Sabre command sequences, one per PCC group, run when an agent
//! finishes a booking. Commands may carry `<>` placeholders that are filled
//! at runtime:
//!
//! | Code | Variable | Example                                  |
//! |------|----------|------------------------------------------|
//! | 1    | Agent    | `6<>` -> `6JOHNSMITH`                    |
//! | 2    | Date1    | `0OTHYYGK1MIA<>` -> `0OTHYYGK1MIA15MAR`  |
//! | 3    | Date2    | `7TAC/<>` -> `7TAC/17MAR`                |
//!
//! ## Example
//!
//! ```
//! use alpha_pnr::{render_for_pcc, PnrToolConfig, Variables, VariableType};
//! use alpha_types::Pcc;
//! use chrono::NaiveDate;
//!
//! let mut config = PnrToolConfig::new();
//! let pcc = Pcc::new("U9XF")?;
//! let group = config.add_group(vec![pcc.clone()])?;
//! config.add_command(&group, "6<>", vec![VariableType::Agent])?;
//! config.add_command(&group, "ER", vec![])?;
//!
//! let today = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
//! let vars = Variables::new("JOHNSMITH", today, today);
//! assert_eq!(render_for_pcc(&config, &pcc, &vars)?, vec!["6JOHNSMITH", "ER"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod group;
pub mod render;

pub use command::{PLACEHOLDER, PnrCommand, VariableType};
pub use config::PnrToolConfig;
pub use error::{PnrError, Result};
pub use group::{Direction, PccCommandGroup, parse_pcc_input};
pub use render::{
    DATE2_OFFSET_DAYS, Variables, format_gds_date, parse_gds_date, render_command,
    render_for_pcc, render_group,
};
