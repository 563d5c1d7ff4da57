use std::fmt;

/// SNS topic addressed by region, account and name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicTarget {
    pub region: String,
    pub account: String,
    pub name: String,
}

impl TopicTarget {
    pub fn new(
        region: impl Into<String>,
        account: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            account: account.into(),
            name: name.into(),
        }
    }

    pub fn arn(&self) -> String {
        format!("arn:aws:sns:{}:{}:{}", self.region, self.account, self.name)
    }
}

impl fmt::Display for TopicTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.arn())
    }
}
