//! Type-ahead location suggestions over a fixed list of Indian cities,
//! states and union territories.

use std::time::{Duration, Instant};

pub const MAX_SUGGESTIONS: usize = 10;

/// How long the list stays open after the field loses focus, so a click on
/// a suggestion that is already in flight still lands.
pub const BLUR_GRACE: Duration = Duration::from_millis(200);

pub const LOCATIONS: &[&str] = &[
    // Major cities
    "India", "Mumbai", "Delhi", "Bangalore", "Hyderabad", "Chennai", "Kolkata", "Pune",
    "Ahmedabad", "Jaipur", "Surat", "Lucknow", "Kanpur", "Nagpur", "Indore", "Thane", "Bhopal",
    "Visakhapatnam", "Pimpri-Chinchwad", "Patna", "Vadodara", "Ghaziabad", "Ludhiana", "Agra",
    "Nashik", "Faridabad", "Meerut", "Rajkot", "Kalyan-Dombivali", "Vasai-Virar", "Varanasi",
    "Srinagar", "Aurangabad", "Dhanbad", "Amritsar", "Navi Mumbai", "Allahabad", "Ranchi",
    "Howrah", "Coimbatore", "Jabalpur", "Gwalior", "Vijayawada", "Jodhpur", "Madurai", "Raipur",
    "Kota", "Guwahati", "Chandigarh", "Solapur", "Hubli-Dharwad", "Bareilly", "Moradabad",
    "Mysore", "Gurgaon", "Aligarh", "Jalandhar", "Tiruchirappalli", "Bhubaneswar", "Salem",
    "Mira-Bhayandar", "Warangal", "Thiruvananthapuram", "Guntur", "Bhiwandi", "Saharanpur",
    "Gorakhpur", "Bikaner", "Amravati", "Noida", "Jamshedpur", "Bhilai Nagar", "Cuttack",
    "Firozabad", "Kochi", "Nellore", "Bhavnagar", "Dehradun", "Durgapur", "Asansol", "Rourkela",
    "Nanded", "Kolhapur", "Ajmer", "Akola", "Gulbarga", "Jamnagar", "Ujjain", "Loni", "Siliguri",
    "Jhansi", "Ulhasnagar", "Jammu", "Sangli-Miraj & Kupwad", "Mangalore", "Erode", "Belgaum",
    "Ambattur", "Tirunelveli", "Malegaon", "Gaya", "Jalgaon", "Udaipur", "Maheshtala",
    // States
    "Andhra Pradesh", "Arunachal Pradesh", "Assam", "Bihar", "Chhattisgarh", "Goa", "Gujarat",
    "Haryana", "Himachal Pradesh", "Jharkhand", "Karnataka", "Kerala", "Madhya Pradesh",
    "Maharashtra", "Manipur", "Meghalaya", "Mizoram", "Nagaland", "Odisha", "Punjab",
    "Rajasthan", "Sikkim", "Tamil Nadu", "Telangana", "Tripura", "Uttar Pradesh", "Uttarakhand",
    "West Bengal",
    // Union territories (Delhi and Chandigarh are listed with the cities)
    "Andaman and Nicobar Islands", "Dadra and Nagar Haveli and Daman and Diu",
    "Jammu and Kashmir", "Ladakh", "Lakshadweep", "Puducherry",
];

/// Case-insensitive substring match, in list order, at most [`MAX_SUGGESTIONS`].
pub fn suggest_locations(query: &str) -> Vec<&'static str> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    LOCATIONS
        .iter()
        .copied()
        .filter(|loc| loc.to_lowercase().contains(&needle))
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// The location input and its suggestion dropdown.
///
/// Time is passed in explicitly so the blur grace period can be driven
/// without sleeping.
#[derive(Debug, Clone, Default)]
pub struct LocationField {
    value: String,
    suggestions: Vec<&'static str>,
    open: bool,
    close_at: Option<Instant>,
}

impl LocationField {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn suggestions(&self) -> &[&'static str] {
        &self.suggestions
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Keystroke: store the text and recompute suggestions.
    pub fn input(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.close_at = None;
        self.refresh();
    }

    /// Focus reopens the list when the field already has text.
    pub fn focus(&mut self) {
        self.close_at = None;
        if !self.value.trim().is_empty() {
            self.refresh();
        }
    }

    pub fn select(&mut self, location: &str) {
        self.value = location.to_string();
        self.suggestions.clear();
        self.open = false;
        self.close_at = None;
    }

    /// Starts the grace period; the list closes on the first `poll` after it.
    pub fn blur(&mut self, now: Instant) {
        self.close_at = Some(now + BLUR_GRACE);
    }

    pub fn poll(&mut self, now: Instant) {
        if matches!(self.close_at, Some(deadline) if now >= deadline) {
            self.open = false;
            self.close_at = None;
        }
    }

    fn refresh(&mut self) {
        self.suggestions = suggest_locations(&self.value);
        self.open = !self.suggestions.is_empty();
    }
}
