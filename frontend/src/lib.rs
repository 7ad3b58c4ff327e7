pub mod config;
pub mod form;
pub mod map;
pub mod places;
pub mod route;
pub mod summary;

use seed::{prelude::*, virtual_dom::AtValue, *};
use serde::Deserialize;
use serde_wasm_bindgen::to_value;
use url::Url;
use shared::{
    wire, Coordinate, ElevationBand, PlaceSuggestion, Preference, PriorityFactor, RouteError,
};
use wasm_bindgen::{
    JsCast,
    prelude::{JsValue, wasm_bindgen},
};

use crate::config::{
    AppConfig, ConstraintMode, EndpointEntry, REQUEST_TIMEOUT_MS, SUGGEST_DEBOUNCE_MS,
};
use crate::form::ConstraintForm;
use crate::map::MapScene;
use crate::places::{EndpointSlot, Slot};
use crate::route::{RequestState, RoutePlanner};

#[wasm_bindgen(module = "/leaflet_map.js")]
extern "C" {
    #[wasm_bindgen(js_name = initMap)]
    fn init_map(style: JsValue);
    #[wasm_bindgen(js_name = updateScene)]
    fn update_scene_js(scene: JsValue);
    #[wasm_bindgen(js_name = updateSelectionMarkers)]
    fn update_selection_markers(start: JsValue, end: JsValue);
}

// Default endpoints around Vancouver.
const DEFAULT_SOURCE: Coordinate = Coordinate { lat: 49.2292, lng: -122.9932 };
const DEFAULT_TARGET: Coordinate = Coordinate { lat: 49.2813912, lng: -123.1217871 };

pub struct Model {
    cfg: AppConfig,
    form: ConstraintForm,
    source: EndpointSlot,
    target: EndpointSlot,
    planner: RoutePlanner,
    click_slot: Slot,
}

impl Model {
    fn slot(&self, slot: Slot) -> &EndpointSlot {
        match slot {
            Slot::Source => &self.source,
            Slot::Target => &self.target,
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut EndpointSlot {
        match slot {
            Slot::Source => &mut self.source,
            Slot::Target => &mut self.target,
        }
    }
}

pub enum Msg {
    DistanceChanged(String),
    ElevationBandChanged(String),
    PoiMinimumChanged(String),
    PriorityFactorChanged(PriorityFactor),
    ElevationPreferenceChanged(Preference),
    PoiPreferenceChanged(Preference),
    LatChanged(Slot, String),
    LngChanged(Slot, String),
    QueryChanged(Slot, String),
    SuggestDebounced(Slot, u64),
    SuggestionsFetched(Slot, u64, Result<Vec<PlaceSuggestion>, String>),
    SuggestionPicked(Slot, PlaceSuggestion),
    PlaceResolved(Slot, u64, Result<Coordinate, String>),
    SetClickSlot(Slot),
    MapClicked { lat: f64, lng: f64 },
    Submit,
    RouteFetched(u64, Result<shared::RoutePath, RouteError>),
}

pub fn init(_: seed::Url, orders: &mut impl Orders<Msg>) -> Model {
    let cfg = AppConfig::from_env();

    if cfg.entry_mode == EndpointEntry::Coordinates {
        orders.stream(streams::window_event(Ev::from("map-click"), |event| {
            let event = event
                .dyn_into::<web_sys::CustomEvent>()
                .expect("map-click event must be CustomEvent");
            let payload: MapClickPayload = serde_wasm_bindgen::from_value(event.detail())
                .unwrap_or(MapClickPayload { lat: 0.0, lng: 0.0 });
            Msg::MapClicked {
                lat: payload.lat,
                lng: payload.lng,
            }
        }));
    }

    let (source, target) = match cfg.entry_mode {
        EndpointEntry::Coordinates => (
            EndpointSlot::with_coordinate(DEFAULT_SOURCE),
            EndpointSlot::with_coordinate(DEFAULT_TARGET),
        ),
        EndpointEntry::PlaceSearch => (EndpointSlot::default(), EndpointSlot::default()),
    };

    let model = Model {
        cfg,
        form: ConstraintForm::default(),
        source,
        target,
        planner: RoutePlanner::default(),
        click_slot: Slot::Source,
    };

    sync_endpoint_markers(&model);
    model
}

pub fn update(msg: Msg, model: &mut Model, orders: &mut impl Orders<Msg>) {
    match msg {
        Msg::DistanceChanged(value) => {
            model.form = model.form.clone().with_distance(value);
        }
        Msg::ElevationBandChanged(label) => {
            if let Some(band) = ElevationBand::from_label(&label) {
                model.form = model.form.clone().with_elevation_band(band);
            }
        }
        Msg::PoiMinimumChanged(value) => {
            model.form = model.form.clone().with_poi_minimum(value);
        }
        Msg::PriorityFactorChanged(factor) => {
            model.form = model.form.clone().with_priority_factor(factor);
        }
        Msg::ElevationPreferenceChanged(preference) => {
            model.form = model.form.clone().with_elevation_preference(preference);
        }
        Msg::PoiPreferenceChanged(preference) => {
            model.form = model.form.clone().with_poi_preference(preference);
        }
        Msg::LatChanged(slot, value) => {
            model.slot_mut(slot).edit_lat(value);
            sync_endpoint_markers(model);
        }
        Msg::LngChanged(slot, value) => {
            model.slot_mut(slot).edit_lng(value);
            sync_endpoint_markers(model);
        }
        Msg::QueryChanged(slot, text) => {
            if let Some(seq) = model.slot_mut(slot).edit_query(text) {
                orders.perform_cmd(cmds::timeout(SUGGEST_DEBOUNCE_MS, move || {
                    Msg::SuggestDebounced(slot, seq)
                }));
            }
            sync_endpoint_markers(model);
        }
        Msg::SuggestDebounced(slot, seq) => {
            let state = model.slot(slot);
            // Typing during the debounce window supersedes this query.
            if state.suggest_current(seq) {
                match query_url(&model.cfg.suggest_api, "input", state.query.trim()) {
                    Some(url) => {
                        orders.perform_cmd(fetch_suggestions(url, slot, seq));
                    }
                    None => web_sys::console::error_1(
                        &format!("[frontend] invalid suggest API root: {}", model.cfg.suggest_api)
                            .into(),
                    ),
                }
            }
        }
        Msg::SuggestionsFetched(slot, seq, result) => {
            let suggestions = result.unwrap_or_else(|detail| {
                web_sys::console::debug_1(
                    &format!("[frontend] suggestion lookup degraded to empty list: {detail}")
                        .into(),
                );
                Vec::new()
            });
            if !model.slot_mut(slot).accept_suggestions(seq, suggestions) {
                web_sys::console::debug_1(&"[frontend] discarding stale suggestion response".into());
            }
        }
        Msg::SuggestionPicked(slot, suggestion) => {
            let seq = model.slot_mut(slot).begin_resolve(&suggestion);
            match query_url(&model.cfg.geocode_api, "place_id", &suggestion.external_id) {
                Some(url) => {
                    orders.perform_cmd(resolve_place(url, slot, seq));
                }
                // The endpoint stays unresolved; submission remains blocked.
                None => web_sys::console::error_1(
                    &format!("[frontend] invalid geocode API root: {}", model.cfg.geocode_api)
                        .into(),
                ),
            }
        }
        Msg::PlaceResolved(slot, seq, result) => {
            let coord = match result {
                Ok(coord) => Some(coord),
                Err(detail) => {
                    web_sys::console::error_1(
                        &format!("[frontend] place resolution failed: {detail}").into(),
                    );
                    None
                }
            };
            if model.slot_mut(slot).accept_resolution(seq, coord) {
                sync_endpoint_markers(model);
            } else {
                web_sys::console::debug_1(&"[frontend] discarding stale resolve response".into());
            }
        }
        Msg::SetClickSlot(slot) => {
            model.click_slot = slot;
        }
        Msg::MapClicked { lat, lng } => {
            let slot = model.slot_mut(model.click_slot);
            slot.edit_lat(format_coord(lat));
            slot.edit_lng(format_coord(lng));
            sync_endpoint_markers(model);
        }
        Msg::Submit => {
            let source = model.source.coordinate();
            let target = model.target.coordinate();
            match model
                .planner
                .begin(source, target, &model.form, model.cfg.constraint_mode)
            {
                Ok((seq, request)) => {
                    orders.perform_cmd(send_route_request(
                        model.cfg.route_api.clone(),
                        request,
                        seq,
                    ));
                }
                // Validation failures surface through the planner state.
                Err(_) => {}
            }
        }
        Msg::RouteFetched(seq, outcome) => {
            if !model.planner.complete(seq, outcome) {
                web_sys::console::debug_1(
                    &"[frontend] discarding route response for superseded request".into(),
                );
                return;
            }
            match model.planner.state() {
                RequestState::Succeeded(path) => {
                    // Scene push and viewport fit happen exactly once per success.
                    let scene =
                        map::project(path, model.source.coordinate(), model.target.coordinate());
                    push_scene(&scene);
                }
                RequestState::Failed(RouteError::Transport { detail }) => {
                    // Previously rendered geometry stays on the map.
                    web_sys::console::error_1(
                        &format!("[frontend] route request failed: {detail}").into(),
                    );
                }
                _ => {}
            }
        }
    }
}

async fn fetch_suggestions(url: String, slot: Slot, seq: u64) -> Msg {
    let result = match Request::new(url)
        .method(Method::Get)
        .timeout(REQUEST_TIMEOUT_MS)
        .fetch()
        .await
    {
        Err(err) => Err(format!("{err:?}")),
        Ok(raw) => match raw.check_status() {
            Err(status_err) => Err(format!("{status_err:?}")),
            Ok(resp) => match resp.json::<wire::SuggestResponse>().await {
                Err(err) => Err(format!("{err:?}")),
                Ok(body) => body.into_suggestions(),
            },
        },
    };

    Msg::SuggestionsFetched(slot, seq, result)
}

async fn resolve_place(url: String, slot: Slot, seq: u64) -> Msg {
    let result = match Request::new(url)
        .method(Method::Get)
        .timeout(REQUEST_TIMEOUT_MS)
        .fetch()
        .await
    {
        Err(err) => Err(format!("{err:?}")),
        Ok(raw) => match raw.check_status() {
            Err(status_err) => Err(format!("{status_err:?}")),
            Ok(resp) => match resp.json::<wire::GeocodeResponse>().await {
                Err(err) => Err(format!("{err:?}")),
                Ok(body) => body.into_coordinate(),
            },
        },
    };

    Msg::PlaceResolved(slot, seq, result)
}

async fn send_route_request(url: String, payload: wire::RouteRequest, seq: u64) -> Msg {
    let outcome = match Request::new(url)
        .method(Method::Post)
        .timeout(REQUEST_TIMEOUT_MS)
        .json(&payload)
    {
        Err(err) => Err(RouteError::transport(format!("{err:?}"))),
        Ok(request) => match request.fetch().await {
            Err(err) => Err(RouteError::transport(format!("{err:?}"))),
            Ok(raw) => match raw.check_status() {
                // A non-success status is always a transport failure, even
                // when the body happens to carry a message field.
                Err(status_err) => Err(RouteError::transport(format!("{status_err:?}"))),
                Ok(resp) => match resp.json::<wire::RouteResponse>().await {
                    Err(err) => Err(RouteError::transport(format!("{err:?}"))),
                    Ok(body) => body.into_outcome(),
                },
            },
        },
    };

    Msg::RouteFetched(seq, outcome)
}

pub fn view(model: &Model) -> Node<Msg> {
    let header = h1!["Scenic Route Planner"];
    let form = view_form(model);
    let summary = view_summary(model);

    div![C!["app-container"], header, form, summary]
}

fn view_form(model: &Model) -> Node<Msg> {
    form![
        C!["controls"],
        view_endpoints(model),
        view_constraints(model),
        button![
            "Get Route",
            ev(Ev::Click, |event| {
                event.prevent_default();
                Msg::Submit
            }),
        ],
        if let Some(notice) = notice(model.planner.state()) {
            p![C!["error"], notice]
        } else {
            empty![]
        }
    ]
}

fn view_endpoints(model: &Model) -> Node<Msg> {
    match model.cfg.entry_mode {
        EndpointEntry::Coordinates => fieldset![
            legend!["Points"],
            coord_field("Start Latitude", &model.source.lat, Slot::Source, Msg::LatChanged),
            coord_field("Start Longitude", &model.source.lng, Slot::Source, Msg::LngChanged),
            coord_field("End Latitude", &model.target.lat, Slot::Target, Msg::LatChanged),
            coord_field("End Longitude", &model.target.lng, Slot::Target, Msg::LngChanged),
            div![
                C!["click-slot"],
                click_slot_radio(model, Slot::Source),
                click_slot_radio(model, Slot::Target),
            ],
            small!["Click the map to fill the selected point."],
        ],
        EndpointEntry::PlaceSearch => fieldset![
            legend!["Places"],
            view_place_search(model, Slot::Source),
            view_place_search(model, Slot::Target),
        ],
    }
}

fn coord_field(label: &str, value: &str, slot: Slot, msg: fn(Slot, String) -> Msg) -> Node<Msg> {
    div![
        C!["input-field"],
        label![label],
        input![
            attrs! {
                At::Value => value,
                At::AutoComplete => "off",
                At::SpellCheck => "false",
            },
            input_ev(Ev::Input, move |text| msg(slot, text)),
        ]
    ]
}

fn click_slot_radio(model: &Model, slot: Slot) -> Node<Msg> {
    label![
        input![
            attrs! {
                At::Type => "radio",
                At::Name => "click-slot",
                At::Checked => bool_attr(model.click_slot == slot),
            },
            ev(Ev::Change, move |_| Msg::SetClickSlot(slot)),
        ],
        span![slot.label()],
    ]
}

fn view_place_search(model: &Model, slot: Slot) -> Node<Msg> {
    let state = model.slot(slot);
    div![
        C!["input-field"],
        label![format!("{} point", slot.label())],
        input![
            attrs! {
                At::Value => state.query,
                At::AutoComplete => "off",
                At::Placeholder => "Search for a place",
            },
            input_ev(Ev::Input, move |text| Msg::QueryChanged(slot, text)),
        ],
        if state.suggestions.is_empty() {
            empty![]
        } else {
            ul![
                C!["suggestions"],
                state.suggestions.iter().map(|suggestion| {
                    let picked = suggestion.clone();
                    li![
                        &suggestion.label,
                        ev(Ev::Click, move |_| Msg::SuggestionPicked(slot, picked)),
                    ]
                })
            ]
        },
        if state.coordinate().is_none() && !state.query.trim().is_empty() {
            small![C!["hint"], "Pick a suggestion to set this point."]
        } else {
            empty![]
        }
    ]
}

fn view_constraints(model: &Model) -> Node<Msg> {
    let distance = div![
        C!["input-field"],
        label!["Input Distance (km)"],
        input![
            attrs! {
                At::Value => model.form.distance,
                At::AutoComplete => "off",
            },
            input_ev(Ev::Input, Msg::DistanceChanged),
        ]
    ];

    match model.cfg.constraint_mode {
        ConstraintMode::Bucketed => fieldset![
            legend!["Constraints"],
            distance,
            div![
                C!["input-field"],
                label!["Elevation Range"],
                select![
                    ElevationBand::ALL.iter().map(|band| option![
                        attrs! {
                            At::Value => band.label(),
                            At::Selected => bool_attr(*band == model.form.elevation_band),
                        },
                        band.label(),
                    ]),
                    input_ev(Ev::Change, Msg::ElevationBandChanged),
                ]
            ],
            div![
                C!["input-field"],
                label!["Minimum POI"],
                input![
                    attrs! {
                        At::Value => model.form.poi_minimum,
                        At::AutoComplete => "off",
                    },
                    input_ev(Ev::Input, Msg::PoiMinimumChanged),
                ]
            ],
            div![
                C!["priority-factor"],
                span!["Priority Factor"],
                priority_radio(model, PriorityFactor::Elevation, "Elevation"),
                priority_radio(model, PriorityFactor::Poi, "POI"),
            ],
        ],
        ConstraintMode::Preference => fieldset![
            legend!["Constraints"],
            distance,
            preference_row(
                "Elevation",
                model.form.elevation_preference,
                Msg::ElevationPreferenceChanged,
            ),
            preference_row("POI", model.form.poi_preference, Msg::PoiPreferenceChanged),
        ],
    }
}

fn priority_radio(model: &Model, factor: PriorityFactor, label_text: &str) -> Node<Msg> {
    label![
        input![
            attrs! {
                At::Type => "radio",
                At::Name => "priority-factor",
                At::Checked => bool_attr(model.form.priority_factor == factor),
            },
            ev(Ev::Change, move |_| Msg::PriorityFactorChanged(factor)),
        ],
        span![label_text],
    ]
}

fn preference_row(label_text: &str, current: Preference, msg: fn(Preference) -> Msg) -> Node<Msg> {
    let group = format!("{}-preference", label_text.to_lowercase());
    let radio = |preference: Preference, text: &str| {
        let name = group.clone();
        label![
            input![
                attrs! {
                    At::Type => "radio",
                    At::Name => name,
                    At::Checked => bool_attr(current == preference),
                },
                ev(Ev::Change, move |_| msg(preference)),
            ],
            span![text],
        ]
    };
    div![
        C!["preference-row"],
        span![label_text],
        radio(Preference::Max, "Max"),
        radio(Preference::Min, "Min"),
    ]
}

fn view_summary(model: &Model) -> Node<Msg> {
    let summary = summary::project(model.planner.state());
    div![
        C!["summary"],
        p![format!("Distance: {}", summary.distance_km)],
        p![format!("Elevation Change: {}", summary.elevation_change_m)],
        p![format!("POI Count: {}", summary.poi_count)],
    ]
}

fn notice(state: &RequestState) -> Option<String> {
    match state {
        RequestState::Failed(err) => Some(err.to_string()),
        _ => None,
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    let cfg = AppConfig::from_env();
    init_map(to_value(&cfg.marker_style).unwrap_or(JsValue::NULL));
    App::start("app", init, update, view);
}

fn push_scene(scene: &MapScene) {
    if let Ok(value) = to_value(scene) {
        update_scene_js(value);
    }
}

fn sync_endpoint_markers(model: &Model) {
    let start = model
        .source
        .coordinate()
        .and_then(|coord| to_value(&coord).ok())
        .unwrap_or(JsValue::NULL);
    let end = model
        .target
        .coordinate()
        .and_then(|coord| to_value(&coord).ok())
        .unwrap_or(JsValue::NULL);
    update_selection_markers(start, end);
}

fn bool_attr(value: bool) -> AtValue {
    if value {
        AtValue::Some("true".into())
    } else {
        AtValue::Ignored
    }
}

fn format_coord(value: f64) -> String {
    format!("{value:.5}")
}

/// Build a proxy URL with a single encoded query parameter.
fn query_url(base: &str, key: &str, value: &str) -> Option<String> {
    let mut url = Url::parse(base).ok()?;
    url.query_pairs_mut().append_pair(key, value);
    Some(url.to_string())
}

#[derive(Deserialize)]
struct MapClickPayload {
    lat: f64,
    lng: f64,
}
