//! HTML widgets. Markup is built with `maud`, which escapes all dynamic
//! content; only trusted renderer output goes through `PreEscaped`.

pub mod widgets;
