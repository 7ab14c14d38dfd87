//! Parameters of a forecast API request and the date window it covers.

use crate::client::error::ClientError;
use crate::forecast_data::validate::REQUIRED_HOURLY_PARAMS;
use bon::bon;
use chrono::{Days, Months, NaiveDate, Utc};
use chrono_tz::Tz;

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_USER_TIMEZONE: &str = "Asia/Novosibirsk";
pub const DEFAULT_LATITUDE: f64 = 55.0344;
pub const DEFAULT_LONGITUDE: f64 = 82.9434;

const DAILY_PARAMS: [&str; 3] = ["sunrise", "sunset", "daylight_duration"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Where and how to request a forecast.
///
/// Units are fixed to what the transformation expects: knots, Fahrenheit, inches,
/// unix timestamps and the location's own timezone.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRequest {
    pub latitude: f64,
    pub longitude: f64,
    /// Timezone used to decide what "today" is.
    pub user_timezone: String,
    pub base_url: String,
}

#[bon]
impl ForecastRequest {
    /// Creates a request.
    ///
    /// # Arguments
    ///
    /// * `.latitude(f64)` / `.longitude(f64)`: Optional. Defaults to Novosibirsk.
    /// * `.user_timezone(String)`: Optional. Defaults to `Asia/Novosibirsk`.
    /// * `.base_url(String)`: Optional. Defaults to the open-meteo forecast endpoint.
    #[builder]
    pub fn new(
        latitude: Option<f64>,
        longitude: Option<f64>,
        user_timezone: Option<String>,
        base_url: Option<String>,
    ) -> Self {
        Self {
            latitude: latitude.unwrap_or(DEFAULT_LATITUDE),
            longitude: longitude.unwrap_or(DEFAULT_LONGITUDE),
            user_timezone: user_timezone.unwrap_or_else(|| DEFAULT_USER_TIMEZONE.to_string()),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }

    /// Full request URL for `window`.
    pub fn url(&self, window: &DateWindow) -> String {
        format!(
            "{}?latitude={}&longitude={}&daily={}&hourly={}\
             &timezone=auto&timeformat=unixtime\
             &wind_speed_unit=kn&temperature_unit=fahrenheit&precipitation_unit=inch\
             &start_date={}&end_date={}",
            self.base_url,
            self.latitude,
            self.longitude,
            DAILY_PARAMS.join(","),
            REQUIRED_HOURLY_PARAMS.join(","),
            window.start.format(DATE_FORMAT),
            window.end.format(DATE_FORMAT),
        )
    }

    /// Today's date in [`ForecastRequest::user_timezone`].
    pub fn today(&self) -> Result<NaiveDate, ClientError> {
        let tz: Tz = self
            .user_timezone
            .parse()
            .map_err(|_| ClientError::UnknownTimezone(self.user_timezone.clone()))?;
        Ok(Utc::now().with_timezone(&tz).date_naive())
    }
}

impl Default for ForecastRequest {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Inclusive range of forecast dates to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Days after `today` covered by the default window.
    pub const DEFAULT_SPAN_DAYS: u64 = 6;
    /// How far back a start date may reach.
    pub const MAX_PAST_MONTHS: u32 = 3;
    /// How far ahead an end date may reach.
    pub const MAX_FUTURE_DAYS: u64 = 15;

    /// The week starting `today`.
    pub fn default_from(today: NaiveDate) -> Self {
        Self {
            start: today,
            end: today + Days::new(Self::DEFAULT_SPAN_DAYS),
        }
    }

    /// Resolves the requested window.
    ///
    /// With `use_default` the dates are ignored and [`DateWindow::default_from`] is used.
    /// Otherwise both dates must be `YYYY-MM-DD`, the start must be later than three
    /// months before `today`, the end no later than 15 days after `today`, and the
    /// start strictly before the end.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use forecast_etl::DateWindow;
    ///
    /// let today = NaiveDate::from_ymd_opt(2025, 5, 5).unwrap();
    /// let window = DateWindow::resolve(Some("2025-05-01"), Some("2025-05-10"), false, today).unwrap();
    /// assert_eq!(window.end, NaiveDate::from_ymd_opt(2025, 5, 10).unwrap());
    ///
    /// let week = DateWindow::resolve(None, None, true, today).unwrap();
    /// assert_eq!(week.end, NaiveDate::from_ymd_opt(2025, 5, 11).unwrap());
    /// ```
    pub fn resolve(
        start: Option<&str>,
        end: Option<&str>,
        use_default: bool,
        today: NaiveDate,
    ) -> Result<Self, ClientError> {
        if use_default {
            return Ok(Self::default_from(today));
        }

        let (Some(start), Some(end)) = (start, end) else {
            return Err(ClientError::MissingDate);
        };
        let start = parse_date(start)?;
        let end = parse_date(end)?;

        // A start exactly three months back already lies in the past relative
        // to the current time of day, so it is rejected too.
        let earliest = today
            .checked_sub_months(Months::new(Self::MAX_PAST_MONTHS))
            .unwrap_or(NaiveDate::MIN);
        if start <= earliest {
            return Err(ClientError::StartTooEarly { start, today });
        }

        let latest = today
            .checked_add_days(Days::new(Self::MAX_FUTURE_DAYS))
            .unwrap_or(NaiveDate::MAX);
        if end > latest {
            return Err(ClientError::EndTooLate { end, today });
        }

        if start >= end {
            return Err(ClientError::StartNotBeforeEnd { start, end });
        }

        Ok(Self { start, end })
    }

    /// Number of days in the window, both ends included.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, ClientError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| ClientError::InvalidDate(value.to_string(), e))
}
