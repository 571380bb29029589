use crate::models::Params;
use crate::provider::ProviderError;
use std::collections::{BTreeSet, HashMap};

/// How one provider argument is derived from the submitted params.
#[derive(Debug, Clone, Copy)]
pub enum Arg {
    Pass(&'static str),
    Rename { from: &'static str, to: &'static str },
    Fixed { name: &'static str, value: &'static str },
    /// Every param not consumed by another rule or the path.
    Rest,
}

#[derive(Debug, Clone, Copy)]
pub struct Route {
    /// Provider namespace, for logs.
    pub operation: &'static str,
    /// `{name}` segments are filled from params.
    pub path: &'static str,
    pub args: &'static [Arg],
}

/// A fully projected GET against the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRequest {
    pub operation: &'static str,
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
}

impl ProviderRequest {
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

impl Route {
    pub fn project(&self, params: &Params) -> Result<ProviderRequest, ProviderError> {
        let mut consumed = BTreeSet::new();

        let segments = self
            .path
            .trim_start_matches('/')
            .split('/')
            .map(|segment| match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(name) => params
                    .get(name)
                    .filter(|v| !v.is_blank())
                    .map(|value| {
                        consumed.insert(name);
                        value.to_string()
                    })
                    .ok_or_else(|| ProviderError::MissingPathParam(name.to_string())),
                None => Ok(segment.to_string()),
            })
            .collect::<Result<Vec<_>, ProviderError>>()?;

        for arg in self.args {
            match *arg {
                Arg::Pass(name) | Arg::Rename { from: name, .. } | Arg::Fixed { name, .. } => {
                    consumed.insert(name);
                }
                Arg::Rest => {}
            }
        }

        let mut query = Vec::new();
        for arg in self.args {
            match *arg {
                Arg::Pass(name) => push_param(&mut query, params, name, name),
                Arg::Rename { from, to } => push_param(&mut query, params, from, to),
                Arg::Fixed { name, value } => query.push((name.to_string(), value.to_string())),
                Arg::Rest => {
                    for (name, value) in params {
                        if !consumed.contains(name.as_str()) && !value.is_blank() {
                            query.push((name.clone(), value.to_string()));
                        }
                    }
                }
            }
        }

        Ok(ProviderRequest {
            operation: self.operation,
            segments,
            query,
        })
    }
}

fn push_param(query: &mut Vec<(String, String)>, params: &Params, from: &str, to: &str) {
    if let Some(value) = params.get(from).filter(|v| !v.is_blank()) {
        query.push((to.to_string(), value.to_string()));
    }
}

#[derive(Debug, Clone, Copy)]
pub enum RouteEntry {
    Live(Route),
    /// Cataloged but deliberately served from mock data.
    Unsupported(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub enum Resolution<'a> {
    Live(&'a Route),
    Unsupported(&'a str),
}

const NO_LIVE_ROUTE: &str = "no live route is registered";

#[derive(Debug, Clone, Default)]
pub struct RoutingTable {
    entries: HashMap<&'static str, RouteEntry>,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(mut self, api_id: &'static str, route: Route) -> Self {
        self.entries.insert(api_id, RouteEntry::Live(route));
        self
    }

    pub fn with_unsupported(mut self, api_id: &'static str, reason: &'static str) -> Self {
        self.entries.insert(api_id, RouteEntry::Unsupported(reason));
        self
    }

    pub fn resolve(&self, api_id: &str) -> Resolution<'_> {
        match self.entries.get(api_id) {
            Some(RouteEntry::Live(route)) => Resolution::Live(route),
            Some(RouteEntry::Unsupported(reason)) => Resolution::Unsupported(reason),
            None => Resolution::Unsupported(NO_LIVE_ROUTE),
        }
    }

    pub fn has_live_route(&self, api_id: &str) -> bool {
        matches!(self.resolve(api_id), Resolution::Live(_))
    }

    /// Routes for the Amadeus self-service REST API.
    pub fn amadeus() -> Self {
        use Arg::*;

        const REST: &[Arg] = &[Rest];
        const FLIGHT_OFFER_REQUIRED: &str = "requires a full flight offer object";

        Self::new()
            .with_route("airline-code-lookup", Route {
                operation: "referenceData.airlines",
                path: "/v1/reference-data/airlines",
                args: &[Rename { from: "airlineName", to: "airlineCodes" }],
            })
            .with_route("airline-routes", Route {
                operation: "airline.destinations",
                path: "/v1/airline/destinations",
                args: &[Pass("airlineCode")],
            })
            .with_route("airport-city-search", Route {
                operation: "referenceData.locations",
                path: "/v1/reference-data/locations",
                args: &[Pass("keyword"), Fixed { name: "subType", value: "AIRPORT,CITY" }],
            })
            .with_route("airport-nearest-relevant", Route {
                operation: "referenceData.locations.airports",
                path: "/v1/reference-data/locations/airports",
                args: REST,
            })
            .with_route("airport-on-time-performance", Route {
                operation: "airport.predictions.onTime",
                path: "/v1/airport/predictions/on-time",
                args: &[Pass("airportCode"), Pass("date")],
            })
            .with_route("airport-routes", Route {
                operation: "airport.directDestinations",
                path: "/v1/airport/direct-destinations",
                args: &[Rename { from: "airportCode", to: "departureAirportCode" }],
            })
            .with_unsupported("branded-fares-upsell", FLIGHT_OFFER_REQUIRED)
            .with_route("city-search", Route {
                operation: "referenceData.locations.cities",
                path: "/v1/reference-data/locations/cities",
                args: &[Pass("keyword")],
            })
            .with_unsupported("flight-availabilities-search", "requires a structured availability request body")
            .with_route("flight-busiest-traveling-period", Route {
                operation: "travel.analytics.airTraffic.busiestPeriod",
                path: "/v1/travel/analytics/air-traffic/busiest-period",
                args: &[Pass("cityCode"), Pass("period"), Fixed { name: "direction", value: "ARRIVING" }],
            })
            .with_route("flight-cheapest-date-search", Route {
                operation: "shopping.flightDates",
                path: "/v1/shopping/flight-dates",
                args: REST,
            })
            .with_route("flight-check-in-links", Route {
                operation: "referenceData.urls.checkinLinks",
                path: "/v2/reference-data/urls/checkin-links",
                args: &[Pass("airlineCode")],
            })
            .with_unsupported("flight-choice-prediction", "requires flight offers JSON as input")
            .with_unsupported("flight-create-orders", FLIGHT_OFFER_REQUIRED)
            .with_route("flight-delay-prediction", Route {
                operation: "travel.predictions.flightDelay",
                path: "/v1/travel/predictions/flight-delay",
                args: REST,
            })
            .with_route("flight-inspiration-search", Route {
                operation: "shopping.flightDestinations",
                path: "/v1/shopping/flight-destinations",
                args: REST,
            })
            .with_route("flight-most-booked-destinations", Route {
                operation: "travel.analytics.airTraffic.booked",
                path: "/v1/travel/analytics/air-traffic/booked",
                args: REST,
            })
            .with_route("flight-most-traveled-destinations", Route {
                operation: "travel.analytics.airTraffic.traveled",
                path: "/v1/travel/analytics/air-traffic/traveled",
                args: REST,
            })
            .with_unsupported("flight-offers-price", FLIGHT_OFFER_REQUIRED)
            .with_route("flight-offers-search", Route {
                operation: "shopping.flightOffersSearch",
                path: "/v2/shopping/flight-offers",
                args: REST,
            })
            .with_route("flight-order-management", Route {
                operation: "booking.flightOrder",
                path: "/v1/booking/flight-orders/{orderId}",
                args: &[],
            })
            .with_route("flight-price-analysis", Route {
                operation: "analytics.itineraryPriceMetrics",
                path: "/v1/analytics/itinerary-price-metrics",
                args: &[
                    Rename { from: "origin", to: "originIataCode" },
                    Rename { from: "destination", to: "destinationIataCode" },
                    Rest,
                ],
            })
            .with_unsupported("hotel-booking", "requires a full hotel offer and guest details")
            .with_route("hotel-list", Route {
                operation: "referenceData.locations.hotels.byCity",
                path: "/v1/reference-data/locations/hotels/by-city",
                args: &[Pass("cityCode")],
            })
            .with_route("hotel-name-autocomplete", Route {
                operation: "referenceData.locations.hotel",
                path: "/v1/reference-data/locations/hotel",
                args: &[Pass("keyword")],
            })
            .with_route("hotel-ratings", Route {
                operation: "eReputation.hotelSentiments",
                path: "/v2/e-reputation/hotel-sentiments",
                args: &[Pass("hotelIds")],
            })
            .with_route("hotel-search", Route {
                operation: "shopping.hotelOffersSearch",
                path: "/v3/shopping/hotel-offers",
                args: REST,
            })
            .with_route("location-score", Route {
                operation: "location.analytics.categoryRatedAreas",
                path: "/v1/location/analytics/category-rated-areas",
                args: REST,
            })
            .with_route("on-demand-flight-status", Route {
                operation: "schedule.flights",
                path: "/v2/schedule/flights",
                args: REST,
            })
            .with_route("points-of-interest", Route {
                operation: "referenceData.locations.pointsOfInterest",
                path: "/v1/reference-data/locations/pois",
                args: &[Pass("latitude"), Pass("longitude"), Pass("radius")],
            })
            .with_unsupported("seatmap-display", "requires a flight order id from a completed booking")
            .with_route("tours-and-activities", Route {
                operation: "shopping.activities",
                path: "/v1/shopping/activities",
                args: REST,
            })
            .with_unsupported("transfer-booking", "transfer APIs are not implemented for live data")
            .with_unsupported("transfer-management", "transfer APIs are not implemented for live data")
            .with_unsupported("transfer-search", "transfer APIs are not implemented for live data")
            .with_route("travel-recommendations", Route {
                operation: "recommendation.locations",
                path: "/v1/reference-data/recommended-locations",
                args: &[Pass("cityCodes"), Fixed { name: "travelerCountryCode", value: "US" }],
            })
            .with_route("travel-restrictions", Route {
                operation: "dutyOfCare.diseases.travelRestriction",
                path: "/v2/duty-of-care/diseases/covid19-area-report",
                args: REST,
            })
            .with_unsupported("trip-parser", "requires a document upload")
            .with_route("trip-purpose-prediction", Route {
                operation: "travel.predictions.tripPurpose",
                path: "/v1/travel/predictions/trip-purpose",
                args: REST,
            })
    }
}
