use serde::Serialize;

/// Official instructions and filing sites referenced from the review screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentLink {
    Form1040,
    ScheduleA,
    ScheduleB,
    ScheduleC,
    Schedule1,
    Fbar,
    FreeFile,
}

impl DocumentLink {
    pub const ALL: [DocumentLink; 7] = [
        DocumentLink::Form1040,
        DocumentLink::ScheduleA,
        DocumentLink::ScheduleB,
        DocumentLink::ScheduleC,
        DocumentLink::Schedule1,
        DocumentLink::Fbar,
        DocumentLink::FreeFile,
    ];

    pub fn from_key(key: &str) -> Option<DocumentLink> {
        let key = key.trim();
        Self::ALL
            .into_iter()
            .find(|link| link.key().eq_ignore_ascii_case(key))
    }

    pub fn key(&self) -> &'static str {
        match self {
            DocumentLink::Form1040 => "form1040",
            DocumentLink::ScheduleA => "scheduleA",
            DocumentLink::ScheduleB => "scheduleB",
            DocumentLink::ScheduleC => "scheduleC",
            DocumentLink::Schedule1 => "schedule1",
            DocumentLink::Fbar => "fbar",
            DocumentLink::FreeFile => "freeFile",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DocumentLink::Form1040 => "Form 1040 instructions",
            DocumentLink::ScheduleA => "Schedule A (itemized deductions)",
            DocumentLink::ScheduleB => "Schedule B (interest and dividends)",
            DocumentLink::ScheduleC => "Schedule C (business profit or loss)",
            DocumentLink::Schedule1 => "Schedule 1 (additional income and adjustments)",
            DocumentLink::Fbar => "FBAR filing (FinCEN 114)",
            DocumentLink::FreeFile => "IRS Free File",
        }
    }

    pub fn url(&self) -> &'static str {
        match self {
            DocumentLink::Form1040 => "https://www.irs.gov/pub/irs-pdf/i1040gi.pdf",
            DocumentLink::ScheduleA => "https://www.irs.gov/pub/irs-pdf/i1040sca.pdf",
            DocumentLink::ScheduleB => "https://www.irs.gov/pub/irs-pdf/i1040sb.pdf",
            DocumentLink::ScheduleC => "https://www.irs.gov/pub/irs-pdf/i1040sc.pdf",
            DocumentLink::Schedule1 => "https://www.irs.gov/pub/irs-pdf/i1040s1.pdf",
            DocumentLink::Fbar => "https://www.irs.gov/filing/fbar-filing",
            DocumentLink::FreeFile => {
                "https://www.irs.gov/filing/free-file-do-your-federal-taxes-for-free"
            }
        }
    }
}
