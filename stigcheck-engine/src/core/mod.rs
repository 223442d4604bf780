mod baseline;
mod enums;
mod sectioned;
mod view;

// 导出常用项
pub use baseline::{BaselineEntry, BaselineSet, HeaderAliases};
pub use enums::{RuleCategory, SatisfiedBy};
pub use sectioned::{Section, SectionedBaseline};
pub use view::{AclView, ConfigLines, RunningConfigView};
