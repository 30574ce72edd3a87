/// Legal and tax identity of the company issuing invoices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuerProfile {
    pub legal_name: &'static str,
    pub address_lines: &'static [&'static str],
    pub gstin: &'static str,
    pub cin: &'static str,
    pub pan: &'static str,
    pub payment_mode: &'static str,
    pub logo_url: &'static str,
}

const VEVVION: IssuerProfile = IssuerProfile {
    legal_name: "VEVVION WELLNESS PRIVATE LIMITED",
    address_lines: &[
        "InstaOffice, 1st Floor, SPD Plaza, Opp. Jyothi Nivas",
        "College, Koramangala Industrial Layout, Bangalore.",
        "Karnataka. 560034",
    ],
    gstin: "29AAICV6290Q1Z8",
    cin: "U52399KA2022PTC159290",
    pan: "AAICV6290Q",
    payment_mode: "Razorpay",
    logo_url: "https://raw.githubusercontent.com/amruthexe/Talent-trek/main/public/image.png",
};

impl IssuerProfile {
    pub fn vevvion() -> Self {
        VEVVION
    }
}

impl Default for IssuerProfile {
    fn default() -> Self {
        Self::vevvion()
    }
}
