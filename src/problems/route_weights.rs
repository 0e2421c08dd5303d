//! Route-weight optimisation
//!
//! Searches four blending weights that turn per-route metrics (travel time,
//! traffic delay, distance) plus a flat complexity term into one score. The
//! fitness of a weight vector is the sum of its scores over every candidate
//! route, maximised.
//!
//! Business-rule bonuses for particular route kinds are kept out of the
//! evaluator and supplied through a [`ScoreAdjustment`].

use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::algorithms::simple_ga::SimpleGABuilder;
use crate::config::{EvolutionConfig, GenomeVariant};
use crate::diagnostics::EvolutionResult;
use crate::error::EvolutionError;
use crate::fitness::traits::Fitness;
use crate::genome::bounds::{Bounds, MultiBounds};
use crate::genome::real_vector::RealVector;
use crate::genome::traits::RealValuedGenome;
use crate::operators::crossover::BlendCrossover;
use crate::operators::mutation::GaussianMutation;
use crate::operators::selection::TournamentSelection;
use crate::population::initializer::UniformInit;

/// Number of weights in a route-weight genome
pub const ROUTE_WEIGHTS: usize = 4;

/// Category of a candidate route as reported by the routing provider
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    Fastest,
    Shortest,
    Eco,
}

/// Precomputed metrics of one candidate route
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteMetrics {
    /// Travel time in minutes, congestion included
    pub travel_time: f64,
    /// Delay caused by traffic, in minutes
    pub traffic_delay: f64,
    /// Distance in kilometres
    pub distance: f64,
    /// Category the routing service assigned to this route
    pub kind: RouteKind,
}

impl RouteMetrics {
    /// Bundle one route's metrics; values are checked when the route joins a
    /// [`RouteDataset`]
    pub fn new(travel_time: f64, traffic_delay: f64, distance: f64, kind: RouteKind) -> Self {
        Self {
            travel_time,
            traffic_delay,
            distance,
            kind,
        }
    }

    /// Metrics must be finite and non-negative
    pub fn validate(&self) -> Result<(), EvolutionError> {
        for (name, value) in [
            ("travel_time", self.travel_time),
            ("traffic_delay", self.traffic_delay),
            ("distance", self.distance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(EvolutionError::InvalidDataset(format!(
                    "{} route has {} = {}",
                    self.kind.label(),
                    name,
                    value
                )));
            }
        }
        Ok(())
    }

    /// Reciprocal-transformed metrics followed by the flat complexity term
    pub fn features(&self) -> [f64; ROUTE_WEIGHTS] {
        [
            1.0 / (self.travel_time + 1.0),
            1.0 / (self.traffic_delay + 1.0),
            1.0 / (self.distance + 1.0),
            1.0,
        ]
    }

    /// Each feature multiplied by its weight. Missing weights count as zero.
    pub fn weighted_components(&self, weights: &[f64]) -> [f64; ROUTE_WEIGHTS] {
        let mut components = [0.0; ROUTE_WEIGHTS];
        for ((component, feature), weight) in components
            .iter_mut()
            .zip(self.features())
            .zip(weights)
        {
            *component = feature * weight;
        }
        components
    }

    /// Unadjusted score under `weights`
    pub fn score(&self, weights: &[f64]) -> f64 {
        self.weighted_components(weights).iter().sum()
    }
}

impl RouteKind {
    /// Lowercase label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fastest => "fastest",
            Self::Shortest => "shortest",
            Self::Eco => "eco",
        }
    }
}

/// A non-empty, validated set of candidate routes
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteDataset {
    routes: Vec<RouteMetrics>,
}

impl RouteDataset {
    /// Validate and wrap a set of routes
    pub fn new(routes: Vec<RouteMetrics>) -> Result<Self, EvolutionError> {
        if routes.is_empty() {
            return Err(EvolutionError::EmptyDataset);
        }
        for route in &routes {
            route.validate()?;
        }
        Ok(Self { routes })
    }

    /// Routes in the order they were supplied
    pub fn routes(&self) -> &[RouteMetrics] {
        &self.routes
    }

    /// Number of routes
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Always false once constructed
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Hook that rescales a route's score after weighting
pub trait ScoreAdjustment: Send + Sync {
    /// Return the adjusted score of `route`
    fn adjust(&self, route: &RouteMetrics, score: f64) -> f64;
}

/// Leaves every score untouched
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAdjustment;

impl ScoreAdjustment for NoAdjustment {
    fn adjust(&self, _route: &RouteMetrics, score: f64) -> f64 {
        score
    }
}

/// Small bonuses for routes matching the user's side preferences: eco
/// routes gain 5% when environmental impact matters (above 50), shortest
/// routes gain 2% when scenic routes are wanted.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PreferenceAdjustment {
    /// Environmental impact slider, 0 to 100
    pub environmental_impact: f64,
    /// Whether scenic, less crowded routes are preferred
    pub scenic: bool,
}

impl ScoreAdjustment for PreferenceAdjustment {
    fn adjust(&self, route: &RouteMetrics, score: f64) -> f64 {
        match route.kind {
            RouteKind::Eco if self.environmental_impact > 50.0 => score * 1.05,
            RouteKind::Shortest if self.scenic => score * 1.02,
            _ => score,
        }
    }
}

impl<A: ScoreAdjustment + ?Sized> ScoreAdjustment for Box<A> {
    fn adjust(&self, route: &RouteMetrics, score: f64) -> f64 {
        (**self).adjust(route, score)
    }
}

/// Aggregate route score of a weight vector, maximised
#[derive(Clone, Debug)]
pub struct RouteWeightFitness<A = NoAdjustment> {
    dataset: RouteDataset,
    adjustment: A,
}

impl RouteWeightFitness<NoAdjustment> {
    /// Score without any adjustment
    pub fn new(dataset: RouteDataset) -> Self {
        Self::with_adjustment(dataset, NoAdjustment)
    }
}

impl<A: ScoreAdjustment> RouteWeightFitness<A> {
    /// Score with an adjustment hook
    pub fn with_adjustment(dataset: RouteDataset, adjustment: A) -> Self {
        Self {
            dataset,
            adjustment,
        }
    }

    pub fn dataset(&self) -> &RouteDataset {
        &self.dataset
    }

    /// Sum of adjusted route scores under `weights`
    pub fn aggregate(&self, weights: &[f64]) -> f64 {
        self.dataset
            .routes()
            .iter()
            .map(|route| self.adjustment.adjust(route, route.score(weights)))
            .sum()
    }
}

impl<A: ScoreAdjustment> Fitness for RouteWeightFitness<A> {
    type Genome = RealVector;
    type Value = f64;

    fn evaluate(&self, genome: &RealVector) -> f64 {
        self.aggregate(genome.genes())
    }
}

/// Travel-time versus traffic trade-off
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficPriority {
    #[default]
    MinimizeTime,
    AvoidTraffic,
}

/// Safety versus speed trade-off
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyPriority {
    #[default]
    FasterRoutes,
    SaferRoutes,
}

/// Preferred route character
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteComplexity {
    #[default]
    Scenic,
    Fastest,
}

/// Preferences applied when presenting scores to a user
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub traffic_vs_time: TrafficPriority,
    pub safety_vs_speed: SafetyPriority,
    /// 0 to 100
    pub environmental_impact: f64,
    pub route_complexity: RouteComplexity,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            traffic_vs_time: TrafficPriority::default(),
            safety_vs_speed: SafetyPriority::default(),
            environmental_impact: 50.0,
            route_complexity: RouteComplexity::default(),
        }
    }
}

impl UserPreferences {
    /// Combined factor applied to every weighted component
    pub fn multiplier(&self) -> f64 {
        let mut factor = match self.traffic_vs_time {
            TrafficPriority::MinimizeTime => 1.1,
            TrafficPriority::AvoidTraffic => 0.9,
        };
        factor *= match self.safety_vs_speed {
            SafetyPriority::FasterRoutes => 0.95,
            SafetyPriority::SaferRoutes => 1.05,
        };
        if self.environmental_impact > 50.0 {
            factor *= 0.85;
        }
        if self.route_complexity == RouteComplexity::Scenic {
            factor *= 1.05;
        }
        factor
    }

    /// The scoring hook matching these preferences
    pub fn score_adjustment(&self) -> PreferenceAdjustment {
        PreferenceAdjustment {
            environmental_impact: self.environmental_impact,
            scenic: self.route_complexity == RouteComplexity::Scenic,
        }
    }
}

/// Per-route breakdown under a chosen weight vector
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteAssessment {
    pub kind: RouteKind,
    /// Weighted time, delay, distance and complexity terms
    pub components: [f64; ROUTE_WEIGHTS],
    /// Preference-adjusted score, rounded to 4 decimals
    pub score: f64,
    pub feedback: String,
}

/// Score each route under `weights` and explain the result
pub fn assess_routes(
    weights: &[f64],
    dataset: &RouteDataset,
    preferences: &UserPreferences,
) -> Vec<RouteAssessment> {
    let multiplier = preferences.multiplier();
    dataset
        .routes()
        .iter()
        .map(|route| {
            let components = route.weighted_components(weights);
            let score = components.iter().map(|c| c * multiplier).sum::<f64>();
            RouteAssessment {
                kind: route.kind,
                components,
                score: round4(score),
                feedback: feedback(route, preferences),
            }
        })
        .collect()
}

fn round4(value: f64) -> f64 {
    (value * 1e4).round() / 1e4
}

fn feedback(route: &RouteMetrics, preferences: &UserPreferences) -> String {
    let mut lines = vec![
        format!(
            "Travel time {:.2} min, of which congestion adds {:.2} min.",
            route.travel_time, route.traffic_delay
        ),
        format!("Distance {:.2} km.", route.distance),
    ];
    match route.kind {
        RouteKind::Eco if preferences.environmental_impact > 50.0 => {
            lines.push("Favoured as the eco-friendly option.".to_string())
        }
        RouteKind::Shortest if preferences.route_complexity == RouteComplexity::Scenic => {
            lines.push("Favoured as the quieter, scenic option.".to_string())
        }
        _ => {}
    }
    lines.join(" ")
}

/// Evolve route weights for `dataset` under a vector-variant configuration
pub fn optimize_route_weights<A, R>(
    config: &EvolutionConfig,
    dataset: RouteDataset,
    adjustment: A,
    rng: &mut R,
) -> Result<EvolutionResult<RealVector>, EvolutionError>
where
    A: ScoreAdjustment,
    R: Rng,
{
    config.validate()?;
    let GenomeVariant::Vector(vector) = &config.variant else {
        return Err(EvolutionError::Configuration(
            "route weights need the vector genome variant".to_string(),
        ));
    };
    if vector.dimension != ROUTE_WEIGHTS {
        return Err(EvolutionError::Configuration(format!(
            "route weights need {} genes, configured {}",
            ROUTE_WEIGHTS, vector.dimension
        )));
    }

    info!(
        "optimising route weights over {} routes",
        dataset.len()
    );

    let bounds = MultiBounds::uniform(Bounds::try_new(vector.init_min, vector.init_max)?, ROUTE_WEIGHTS);
    SimpleGABuilder::new()
        .config(config.ga_config())
        .initializer(UniformInit::new(bounds))
        .selection(TournamentSelection::new(config.tournament_size))
        .crossover(BlendCrossover::new(vector.blend_alpha))
        .mutation(GaussianMutation::new(vector.mutation_sigma, vector.mutation_indpb)?)
        .fitness(RouteWeightFitness::with_adjustment(dataset, adjustment))
        .build()?
        .run(rng)
}
