use std::fmt::{Display, Formatter};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Backend {
    /// Monolithic `/queue` and `/history` endpoints carrying full task records.
    Legacy,
    /// Paginated `/jobs` table returning lightweight summaries.
    JobTable,
}

impl Backend {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::JobTable => "job_table",
        }
    }
}

impl Display for Backend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Operation {
    FetchQueue,
    FetchHistory,
    FetchDetail,
    Interrupt,
}

impl Operation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FetchQueue => "fetch_queue",
            Self::FetchHistory => "fetch_history",
            Self::FetchDetail => "fetch_detail",
            Self::Interrupt => "interrupt",
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
