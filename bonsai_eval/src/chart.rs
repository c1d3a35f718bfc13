use crate::derive::Metric;
use crate::measure::fmt_position;
use crate::EvalError;
use color_eyre::Report;
use tracing::debug;

/// Fraction of a group's width occupied by its bars.
const GROUP_FILL: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    None,
    Circle,
    Square,
    Diamond,
    Star,
    X,
    TriangleUp,
    TriangleLeft,
}

impl Marker {
    // https://matplotlib.org/stable/api/markers_api.html
    pub fn symbol(&self) -> &'static str {
        match self {
            Marker::None => "",
            Marker::Circle => "o",
            Marker::Square => "s",
            Marker::Diamond => "D",
            Marker::Star => "*",
            Marker::X => "x",
            Marker::TriangleUp => "^",
            Marker::TriangleLeft => "<",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
    None,
}

impl LineStyle {
    pub fn symbol(&self) -> &'static str {
        match self {
            LineStyle::Solid => "-",
            LineStyle::Dashed => "--",
            LineStyle::None => "None",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    Filled,
    Open,
}

/// Visual style of a series.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub marker: Marker,
    pub marker_size: f64,
    pub line_style: LineStyle,
    pub line_width: f64,
    pub fill: Fill,
    pub color: Option<String>,
    pub hatch: Option<String>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            marker: Marker::None,
            marker_size: 8.0,
            line_style: LineStyle::Solid,
            line_width: 2.0,
            fill: Fill::Filled,
            color: None,
            hatch: None,
        }
    }
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn marker(mut self, marker: Marker) -> Self {
        self.marker = marker;
        self
    }

    pub fn marker_size(mut self, marker_size: f64) -> Self {
        self.marker_size = marker_size;
        self
    }

    pub fn line_style(mut self, line_style: LineStyle) -> Self {
        self.line_style = line_style;
        self
    }

    pub fn line_width(mut self, line_width: f64) -> Self {
        self.line_width = line_width;
        self
    }

    pub fn open(mut self) -> Self {
        self.fill = Fill::Open;
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn hatch(mut self, hatch: impl Into<String>) -> Self {
        self.hatch = Some(hatch.into());
        self
    }
}

/// A labelled sequence of derived values aligned to the chart axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: Option<String>,
    pub values: Vec<Metric>,
    pub style: Style,
}

impl Series {
    pub fn new(
        label: impl Into<String>,
        values: impl Into<Vec<Metric>>,
        style: Style,
    ) -> Self {
        Self {
            label: Some(label.into()),
            values: values.into(),
            style,
        }
    }

    /// A series that is drawn but left out of the legend.
    pub fn unlabeled(values: impl Into<Vec<Metric>>, style: Style) -> Self {
        Self {
            label: None,
            values: values.into(),
            style,
        }
    }

    pub fn from_values(
        label: impl Into<String>,
        values: &[f64],
        style: Style,
    ) -> Self {
        let values: Vec<_> = values.iter().copied().map(Metric::from).collect();
        Self::new(label, values, style)
    }

    fn label(&self) -> &str {
        self.label.as_deref().unwrap_or("(unlabeled)")
    }
}

/// One cost category of a stacked breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub label: String,
    pub hatch: String,
    pub values: Vec<f64>,
}

impl Component {
    pub fn new(
        label: impl Into<String>,
        hatch: impl Into<String>,
        values: Vec<f64>,
    ) -> Self {
        Self {
            label: label.into(),
            hatch: hatch.into(),
            values,
        }
    }
}

/// The stacked cost components of one configuration, all drawn over the
/// configuration's base color.
#[derive(Debug, Clone, PartialEq)]
pub struct Breakdown {
    pub label: String,
    pub color: String,
    pub components: Vec<Component>,
}

impl Breakdown {
    pub fn new(label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            color: color.into(),
            components: Vec::new(),
        }
    }

    pub fn component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    /// Height of each stacked bar.
    pub fn totals(&self, len: usize) -> Vec<f64> {
        let mut totals = vec![0.0; len];
        for component in self.components.iter() {
            for (total, value) in totals.iter_mut().zip(&component.values) {
                *total += value;
            }
        }
        totals
    }
}

/// How the items of a panel are drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    Line,
    /// Series are drawn as bars placed side by side within a group of width
    /// `group_width` centered on each axis point.
    Bar { group_width: f64 },
    /// Breakdowns are drawn as stacked bars of width `bar_width`.
    Stacked { bar_width: f64 },
}

impl Mode {
    fn name(&self) -> &'static str {
        match self {
            Mode::Line => "line",
            Mode::Bar { .. } => "bar",
            Mode::Stacked { .. } => "stacked",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Layout {
    Single,
    /// Two vertically stacked panels sharing the x axis.
    SharedX { height_ratios: [f64; 2] },
}

impl Layout {
    pub fn shared_x() -> Self {
        Layout::SharedX {
            height_ratios: [1.0, 1.0],
        }
    }

    pub fn panels(&self) -> usize {
        match self {
            Layout::Single => 1,
            Layout::SharedX { .. } => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AxisSpec {
    pub ticks: Vec<f64>,
    pub tick_labels: Vec<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub yticks: Option<Vec<f64>>,
    pub xtick_rotation: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendSpec {
    pub loc: String,
    pub ncol: usize,
    pub frameon: bool,
    pub expand: bool,
}

impl Default for LegendSpec {
    fn default() -> Self {
        Self {
            loc: String::from("best"),
            ncol: 1,
            frameon: true,
            expand: false,
        }
    }
}

impl LegendSpec {
    /// Frameless legend spanning the top of the panel.
    pub fn top(ncol: usize) -> Self {
        Self {
            loc: String::from("upper left"),
            ncol,
            frameon: false,
            expand: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LegendEntry {
    Line { label: String, style: Style },
    Patch {
        label: String,
        color: Option<String>,
        hatch: Option<String>,
    },
}

/// Figure-wide presentation settings.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureStyle {
    pub width: f64,
    pub height: f64,
    pub font_family: Option<String>,
    pub label_size: f64,
    pub tick_size: f64,
    pub legend_size: f64,
    /// Vertical space between panels.
    pub hspace: Option<f64>,
    pub tight_layout: bool,
}

impl Default for FigureStyle {
    fn default() -> Self {
        Self {
            width: 5.0,
            height: 4.0,
            font_family: Some(String::from("Times New Roman")),
            label_size: 18.0,
            tick_size: 15.0,
            legend_size: 14.0,
            hspace: None,
            tight_layout: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// Blocks on an interactive window.
    Show,
    File {
        path: String,
        format: String,
        dpi: u32,
    },
}

impl Output {
    pub fn pdf(path: impl Into<String>) -> Self {
        Output::File {
            path: path.into(),
            format: String::from("pdf"),
            dpi: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineSpec {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub label: Option<String>,
    pub style: Style,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarSpec {
    pub x: Vec<f64>,
    pub heights: Vec<f64>,
    pub bottoms: Option<Vec<f64>>,
    pub width: f64,
    pub label: Option<String>,
    pub style: Style,
}

/// Whatever actually draws a chart.
pub trait Backend {
    fn start(&mut self, layout: Layout, style: &FigureStyle)
        -> Result<(), Report>;

    fn line(&mut self, panel: usize, line: LineSpec) -> Result<(), Report>;

    fn bar(&mut self, panel: usize, bar: BarSpec) -> Result<(), Report>;

    fn axis(&mut self, panel: usize, axis: &AxisSpec) -> Result<(), Report>;

    fn legend(
        &mut self,
        panel: usize,
        legend: &LegendSpec,
        entries: &[LegendEntry],
    ) -> Result<(), Report>;

    fn finish(&mut self, output: &Output) -> Result<(), Report>;
}

#[derive(Debug, Clone, PartialEq)]
enum Item {
    Series(Series),
    Breakdown { offset: f64, breakdown: Breakdown },
}

#[derive(Debug, Clone, PartialEq)]
struct Panel {
    mode: Mode,
    items: Vec<Item>,
    axis: Option<AxisSpec>,
    legend: Option<LegendSpec>,
}

impl Panel {
    fn new() -> Self {
        Self {
            mode: Mode::Line,
            items: Vec::new(),
            axis: None,
            legend: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChartBuilder {
    layout: Layout,
    axis: Vec<f64>,
    panels: Vec<Panel>,
    style: FigureStyle,
}

impl ChartBuilder {
    /// Creates a chart whose panels all share `axis`.
    pub fn new(layout: Layout, axis: Vec<f64>) -> Self {
        let panels = (0..layout.panels()).map(|_| Panel::new()).collect();
        Self {
            layout,
            axis,
            panels,
            style: FigureStyle::default(),
        }
    }

    pub fn axis(&self) -> &[f64] {
        &self.axis
    }

    pub fn style(&mut self, style: FigureStyle) -> &mut Self {
        self.style = style;
        self
    }

    /// Changes how panel `panel` is drawn. Only allowed while the panel is
    /// still empty.
    pub fn mode(
        &mut self,
        panel: usize,
        mode: Mode,
    ) -> Result<&mut Self, EvalError> {
        let current = self.panel(panel)?;
        if !current.items.is_empty() && current.mode != mode {
            return Err(EvalError::ModeMismatch {
                panel,
                mode: current.mode.name(),
            });
        }
        current.mode = mode;
        Ok(self)
    }

    pub fn add_series(
        &mut self,
        panel: usize,
        series: Series,
    ) -> Result<&mut Self, EvalError> {
        let expected = self.axis.len();
        let current = self.panel(panel)?;
        if let Mode::Stacked { .. } = current.mode {
            return Err(EvalError::ModeMismatch {
                panel,
                mode: current.mode.name(),
            });
        }
        if series.values.len() != expected {
            return Err(EvalError::AxisMismatch {
                label: series.label().to_string(),
                expected,
                found: series.values.len(),
            });
        }
        current.items.push(Item::Series(series));
        Ok(self)
    }

    /// Adds one configuration's stacked bars, shifted by `axis_offset` from
    /// each axis point.
    pub fn add_stacked_breakdown(
        &mut self,
        panel: usize,
        axis_offset: f64,
        breakdown: Breakdown,
    ) -> Result<&mut Self, EvalError> {
        let axis = self.axis.clone();
        let current = self.panel(panel)?;
        if !matches!(current.mode, Mode::Stacked { .. }) {
            return Err(EvalError::ModeMismatch {
                panel,
                mode: current.mode.name(),
            });
        }
        for component in breakdown.components.iter() {
            let label = format!("{} {}", breakdown.label, component.label);
            if component.values.len() != axis.len() {
                return Err(EvalError::AxisMismatch {
                    label,
                    expected: axis.len(),
                    found: component.values.len(),
                });
            }
            for (x, value) in axis.iter().zip(&component.values) {
                if !value.is_finite() {
                    return Err(EvalError::invalid(
                        label,
                        fmt_position(*x),
                        "non-finite component",
                    ));
                }
                if *value < 0.0 {
                    return Err(EvalError::NegativeComponent {
                        label,
                        position: fmt_position(*x),
                        value: *value,
                    });
                }
            }
        }
        current.items.push(Item::Breakdown {
            offset: axis_offset,
            breakdown,
        });
        Ok(self)
    }

    pub fn set_axis(
        &mut self,
        panel: usize,
        ticks: Vec<f64>,
        tick_labels: Vec<String>,
        x_label: Option<&str>,
        y_label: Option<&str>,
    ) -> Result<&mut Self, EvalError> {
        check_monotonic(panel, &ticks)?;
        if !tick_labels.is_empty() && tick_labels.len() != ticks.len() {
            return Err(EvalError::AxisMismatch {
                label: String::from("tick labels"),
                expected: ticks.len(),
                found: tick_labels.len(),
            });
        }
        let current = self.panel(panel)?;
        let axis = current.axis.get_or_insert_with(AxisSpec::default);
        axis.ticks = ticks;
        axis.tick_labels = tick_labels;
        axis.x_label = x_label.map(String::from);
        axis.y_label = y_label.map(String::from);
        Ok(self)
    }

    pub fn set_yticks(
        &mut self,
        panel: usize,
        ticks: Vec<f64>,
    ) -> Result<&mut Self, EvalError> {
        check_monotonic(panel, &ticks)?;
        let current = self.panel(panel)?;
        current.axis.get_or_insert_with(AxisSpec::default).yticks = Some(ticks);
        Ok(self)
    }

    pub fn rotate_xticks(
        &mut self,
        panel: usize,
        degrees: f64,
    ) -> Result<&mut Self, EvalError> {
        let current = self.panel(panel)?;
        current
            .axis
            .get_or_insert_with(AxisSpec::default)
            .xtick_rotation = Some(degrees);
        Ok(self)
    }

    pub fn legend(
        &mut self,
        panel: usize,
        legend: LegendSpec,
    ) -> Result<&mut Self, EvalError> {
        self.panel(panel)?.legend = Some(legend);
        Ok(self)
    }

    pub fn build(self) -> Chart {
        Chart {
            layout: self.layout,
            axis: self.axis,
            panels: self.panels,
            style: self.style,
        }
    }

    fn panel(&mut self, panel: usize) -> Result<&mut Panel, EvalError> {
        let panels = self.panels.len();
        self.panels
            .get_mut(panel)
            .ok_or(EvalError::UnknownPanel { panel, panels })
    }
}

fn check_monotonic(panel: usize, ticks: &[f64]) -> Result<(), EvalError> {
    if ticks.windows(2).all(|pair| pair[0] <= pair[1]) {
        Ok(())
    } else {
        Err(EvalError::NonMonotonicTicks { panel })
    }
}

/// A fully composed chart. Rendering does no computation beyond placing
/// already derived values.
#[derive(Debug, Clone)]
pub struct Chart {
    layout: Layout,
    axis: Vec<f64>,
    panels: Vec<Panel>,
    style: FigureStyle,
}

impl Chart {
    pub fn axis(&self) -> &[f64] {
        &self.axis
    }

    pub fn render<B: Backend>(
        &self,
        backend: &mut B,
        output: &Output,
    ) -> Result<(), Report> {
        backend.start(self.layout, &self.style)?;
        for (index, panel) in self.panels.iter().enumerate() {
            let entries = match panel.mode {
                Mode::Line => self.render_lines(backend, index, panel)?,
                Mode::Bar { group_width } => {
                    self.render_bars(backend, index, panel, group_width)?
                }
                Mode::Stacked { bar_width } => {
                    self.render_stacks(backend, index, panel, bar_width)?
                }
            };
            if let Some(axis) = &panel.axis {
                backend.axis(index, axis)?;
            }
            if let Some(legend) = &panel.legend {
                backend.legend(index, legend, &entries)?;
            }
        }
        debug!("rendering chart to {:?}", output);
        backend.finish(output)
    }

    fn render_lines<B: Backend>(
        &self,
        backend: &mut B,
        index: usize,
        panel: &Panel,
    ) -> Result<Vec<LegendEntry>, Report> {
        let mut entries = Vec::new();
        for series in Self::series(panel) {
            let line = LineSpec {
                x: self.axis.clone(),
                y: series.values.iter().map(Metric::plotted).collect(),
                label: series.label.clone(),
                style: series.style.clone(),
            };
            backend.line(index, line)?;
            if let Some(label) = &series.label {
                entries.push(LegendEntry::Line {
                    label: label.clone(),
                    style: series.style.clone(),
                });
            }
        }
        Ok(entries)
    }

    fn render_bars<B: Backend>(
        &self,
        backend: &mut B,
        index: usize,
        panel: &Panel,
        group_width: f64,
    ) -> Result<Vec<LegendEntry>, Report> {
        let count = Self::series(panel).count();
        if count == 0 {
            return Ok(Vec::new());
        }
        let width = group_width * GROUP_FILL / count as f64;
        // we need to shift all to the left by half of the number of series
        let shift_left = count as f64 / 2.0;
        // we also need to shift half bar to the right
        let shift_right = 0.5;

        let mut entries = Vec::new();
        for (position, series) in Self::series(panel).enumerate() {
            let shift = (position as f64 - shift_left + shift_right) * width;
            let bar = BarSpec {
                x: self.axis.iter().map(|x| x + shift).collect(),
                heights: series.values.iter().map(Metric::plotted).collect(),
                bottoms: None,
                width,
                label: series.label.clone(),
                style: series.style.clone(),
            };
            backend.bar(index, bar)?;
            if let Some(label) = &series.label {
                entries.push(LegendEntry::Patch {
                    label: label.clone(),
                    color: series.style.color.clone(),
                    hatch: series.style.hatch.clone(),
                });
            }
        }
        Ok(entries)
    }

    fn render_stacks<B: Backend>(
        &self,
        backend: &mut B,
        index: usize,
        panel: &Panel,
        width: f64,
    ) -> Result<Vec<LegendEntry>, Report> {
        let mut configurations = Vec::new();
        let mut components: Vec<(String, String)> = Vec::new();

        for item in panel.items.iter() {
            let (offset, breakdown) = match item {
                Item::Breakdown { offset, breakdown } => (offset, breakdown),
                Item::Series(_) => continue,
            };
            let x: Vec<_> = self.axis.iter().map(|x| x + offset).collect();
            let mut bottoms = vec![0.0; self.axis.len()];
            for component in breakdown.components.iter() {
                let bar = BarSpec {
                    x: x.clone(),
                    heights: component.values.clone(),
                    bottoms: Some(bottoms.clone()),
                    width,
                    label: Some(breakdown.label.clone()),
                    style: Style::new()
                        .color(breakdown.color.clone())
                        .hatch(component.hatch.clone()),
                };
                backend.bar(index, bar)?;
                for (bottom, value) in bottoms.iter_mut().zip(&component.values)
                {
                    *bottom += value;
                }
                let key = (component.label.clone(), component.hatch.clone());
                if !components.contains(&key) {
                    components.push(key);
                }
            }
            configurations.push(LegendEntry::Patch {
                label: breakdown.label.clone(),
                color: Some(breakdown.color.clone()),
                hatch: None,
            });
        }

        // one patch per configuration, then one per cost category
        let categories =
            components
                .into_iter()
                .map(|(label, hatch)| LegendEntry::Patch {
                    label,
                    color: Some(String::from("white")),
                    hatch: Some(hatch),
                });
        configurations.extend(categories);
        Ok(configurations)
    }

    fn series(panel: &Panel) -> impl Iterator<Item = &Series> {
        panel.items.iter().filter_map(|item| match item {
            Item::Series(series) => Some(series),
            Item::Breakdown { .. } => None,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    /// Backend that records every call instead of drawing.
    #[derive(Default)]
    pub(crate) struct Recorder {
        pub started: Option<Layout>,
        pub lines: Vec<(usize, LineSpec)>,
        pub bars: Vec<(usize, BarSpec)>,
        pub axes: Vec<(usize, AxisSpec)>,
        pub legends: Vec<(usize, Vec<LegendEntry>)>,
        pub output: Option<Output>,
    }

    impl Backend for Recorder {
        fn start(
            &mut self,
            layout: Layout,
            _style: &FigureStyle,
        ) -> Result<(), Report> {
            self.started = Some(layout);
            Ok(())
        }

        fn line(&mut self, panel: usize, line: LineSpec) -> Result<(), Report> {
            self.lines.push((panel, line));
            Ok(())
        }

        fn bar(&mut self, panel: usize, bar: BarSpec) -> Result<(), Report> {
            self.bars.push((panel, bar));
            Ok(())
        }

        fn axis(
            &mut self,
            panel: usize,
            axis: &AxisSpec,
        ) -> Result<(), Report> {
            self.axes.push((panel, axis.clone()));
            Ok(())
        }

        fn legend(
            &mut self,
            panel: usize,
            _legend: &LegendSpec,
            entries: &[LegendEntry],
        ) -> Result<(), Report> {
            self.legends.push((panel, entries.to_vec()));
            Ok(())
        }

        fn finish(&mut self, output: &Output) -> Result<(), Report> {
            self.output = Some(output.clone());
            Ok(())
        }
    }

    #[quickcheck]
    fn stack_height_is_component_sum(components: Vec<Vec<u16>>) -> bool {
        let len = 4;
        let axis: Vec<_> = (0..len).map(|x| x as f64).collect();
        let components: Vec<Vec<f64>> = components
            .into_iter()
            .map(|values| {
                let mut values: Vec<_> =
                    values.into_iter().map(|v| v as f64).collect();
                values.resize(len, 0.0);
                values
            })
            .collect();

        let mut breakdown = Breakdown::new("MESI", "#E69F00");
        for (i, values) in components.iter().enumerate() {
            let component =
                Component::new(i.to_string(), "///", values.clone());
            breakdown = breakdown.component(component);
        }
        let expected = breakdown.totals(len);

        let mut builder = ChartBuilder::new(Layout::Single, axis);
        builder
            .mode(0, Mode::Stacked { bar_width: 0.5 })
            .unwrap()
            .add_stacked_breakdown(0, 0.0, breakdown)
            .unwrap();
        let mut recorder = Recorder::default();
        builder
            .build()
            .render(&mut recorder, &Output::Show)
            .unwrap();

        // the top of the stack is the top of the last component drawn
        let mut heights = vec![0.0; len];
        for (_, bar) in recorder.bars.iter() {
            let bottoms = bar.bottoms.as_ref().unwrap();
            for (i, height) in heights.iter_mut().enumerate() {
                *height = f64::max(*height, bottoms[i] + bar.heights[i]);
            }
        }
        heights == expected
    }

    #[test]
    fn series_must_match_axis() {
        let mut builder = ChartBuilder::new(Layout::Single, vec![1.0, 6.0]);
        let err = builder
            .add_series(0, Series::from_values("bonsai", &[1.0], Style::new()))
            .unwrap_err();
        assert_eq!(
            err,
            EvalError::AxisMismatch {
                label: String::from("bonsai"),
                expected: 2,
                found: 1,
            }
        );
    }

    #[test]
    fn panels_must_exist() {
        let mut builder = ChartBuilder::new(Layout::Single, vec![1.0]);
        let series = Series::from_values("bonsai", &[1.0], Style::new());
        assert_eq!(
            builder.add_series(1, series.clone()).unwrap_err(),
            EvalError::UnknownPanel {
                panel: 1,
                panels: 1
            }
        );

        let mut builder = ChartBuilder::new(Layout::shared_x(), vec![1.0]);
        assert!(builder.add_series(1, series).is_ok());
    }

    #[test]
    fn ticks_must_be_monotonic() {
        let mut builder = ChartBuilder::new(Layout::Single, vec![1.0]);
        assert_eq!(
            builder
                .set_axis(0, vec![1.0, 0.0], Vec::new(), None, None)
                .unwrap_err(),
            EvalError::NonMonotonicTicks { panel: 0 }
        );
        assert!(builder
            .set_axis(0, vec![1.0, 1.0, 2.0], Vec::new(), None, None)
            .is_ok());
    }

    #[test]
    fn negative_components_are_rejected() {
        let mut builder = ChartBuilder::new(Layout::Single, vec![0.0, 1.0]);
        builder.mode(0, Mode::Stacked { bar_width: 5.0 }).unwrap();
        let breakdown = Breakdown::new("SMR", "#56B4E9").component(
            Component::new("Local NVM Access", "ooo", vec![1.0, -2.0]),
        );
        let err = builder
            .add_stacked_breakdown(0, 0.0, breakdown)
            .unwrap_err();
        assert_eq!(
            err,
            EvalError::NegativeComponent {
                label: String::from("SMR Local NVM Access"),
                position: String::from("1"),
                value: -2.0,
            }
        );
    }

    #[test]
    fn modes_do_not_mix() {
        let mut builder = ChartBuilder::new(Layout::Single, vec![0.0]);
        builder.mode(0, Mode::Stacked { bar_width: 5.0 }).unwrap();
        let series = Series::from_values("bonsai", &[1.0], Style::new());
        assert!(matches!(
            builder.add_series(0, series),
            Err(EvalError::ModeMismatch { .. })
        ));
    }

    #[test]
    fn mode_is_fixed_once_filled() {
        let mut builder = ChartBuilder::new(Layout::Single, vec![0.0]);
        let series = Series::from_values("bonsai", &[1.0], Style::new());
        builder.add_series(0, series).unwrap();
        // same mode is fine
        assert!(builder.mode(0, Mode::Line).is_ok());
        assert_eq!(
            builder
                .mode(0, Mode::Bar { group_width: 10.0 })
                .unwrap_err(),
            EvalError::ModeMismatch {
                panel: 0,
                mode: "line",
            }
        );
    }

    #[test]
    fn components_must_match_axis() {
        let mut builder = ChartBuilder::new(Layout::Single, vec![0.0, 1.0]);
        builder.mode(0, Mode::Stacked { bar_width: 5.0 }).unwrap();
        let breakdown = Breakdown::new("MESI", "#E69F00").component(
            Component::new("Local DRAM Access", "///", vec![1.0]),
        );
        assert_eq!(
            builder
                .add_stacked_breakdown(0, 0.0, breakdown)
                .unwrap_err(),
            EvalError::AxisMismatch {
                label: String::from("MESI Local DRAM Access"),
                expected: 2,
                found: 1,
            }
        );
    }

    #[test]
    fn non_finite_components_are_rejected() {
        let mut builder = ChartBuilder::new(Layout::Single, vec![0.0, 33.0]);
        builder.mode(0, Mode::Stacked { bar_width: 5.0 }).unwrap();
        for value in [f64::NAN, f64::INFINITY] {
            let breakdown = Breakdown::new("WoSI", "#009E73").component(
                Component::new("Local DRAM Access", "///", vec![1.0, value]),
            );
            let err = builder
                .add_stacked_breakdown(0, 0.0, breakdown)
                .unwrap_err();
            assert!(matches!(
                err,
                EvalError::InvalidMeasurement { ref config, ref position, .. }
                    if config == "WoSI Local DRAM Access" && position == "33"
            ));
        }
    }

    #[test]
    fn tick_labels_must_match_ticks() {
        let mut builder = ChartBuilder::new(Layout::Single, vec![1.0, 6.0]);
        let labels = vec![String::from("1")];
        assert_eq!(
            builder
                .set_axis(0, vec![1.0, 6.0], labels, None, None)
                .unwrap_err(),
            EvalError::AxisMismatch {
                label: String::from("tick labels"),
                expected: 2,
                found: 1,
            }
        );
    }

    #[test]
    fn bars_are_placed_side_by_side() {
        let mut builder = ChartBuilder::new(Layout::Single, vec![0.0, 10.0]);
        builder
            .mode(0, Mode::Bar { group_width: 10.0 })
            .unwrap()
            .add_series(0, Series::from_values("a", &[1.0, 2.0], Style::new()))
            .unwrap()
            .add_series(0, Series::from_values("b", &[3.0, 4.0], Style::new()))
            .unwrap()
            .legend(0, LegendSpec::default())
            .unwrap();
        let mut recorder = Recorder::default();
        builder
            .build()
            .render(&mut recorder, &Output::Show)
            .unwrap();

        assert_eq!(recorder.bars.len(), 2);
        let (_, a) = &recorder.bars[0];
        let (_, b) = &recorder.bars[1];
        assert_eq!(a.width, 4.0);
        assert_eq!(a.x, vec![-2.0, 8.0]);
        assert_eq!(b.x, vec![2.0, 12.0]);
        assert_eq!(recorder.legends[0].1.len(), 2);
    }

    #[test]
    fn saturated_and_missing_points() {
        let values =
            vec![Metric::Value(1.5), Metric::Saturated, Metric::Missing];
        let mut builder =
            ChartBuilder::new(Layout::shared_x(), vec![1.0, 2.0, 3.0]);
        builder
            .add_series(0, Series::new("viper", values, Style::new()))
            .unwrap()
            .set_axis(1, vec![1.0, 2.0, 3.0], Vec::new(), Some("threads"), None)
            .unwrap();
        let mut recorder = Recorder::default();
        builder
            .build()
            .render(&mut recorder, &Output::pdf("plot.pdf"))
            .unwrap();

        assert_eq!(recorder.started, Some(Layout::shared_x()));
        let (panel, line) = &recorder.lines[0];
        assert_eq!(*panel, 0);
        assert_eq!(line.y[0], 1.5);
        assert_eq!(line.y[1], 0.0);
        assert!(line.y[2].is_nan());
        assert_eq!(recorder.axes[0].0, 1);
        assert_eq!(recorder.output, Some(Output::pdf("plot.pdf")));
    }

    #[test]
    fn stacked_legend() {
        let mut builder = ChartBuilder::new(Layout::Single, vec![0.0, 100.0]);
        builder.mode(0, Mode::Stacked { bar_width: 5.0 }).unwrap();
        for (name, offset, color) in
            [("MESI", -5.0, "#E69F00"), ("WoSI", 5.0, "#009E73")]
        {
            let local = Component::new("Local DRAM", "///", vec![1.0, 0.0]);
            let remote =
                Component::new("Remote DRAM", "\\\\\\", vec![0.0, 1.0]);
            let breakdown =
                Breakdown::new(name, color).component(local).component(remote);
            builder.add_stacked_breakdown(0, offset, breakdown).unwrap();
        }
        builder.legend(0, LegendSpec::default()).unwrap();
        let mut recorder = Recorder::default();
        builder
            .build()
            .render(&mut recorder, &Output::Show)
            .unwrap();

        assert_eq!(recorder.bars.len(), 4);
        assert_eq!(recorder.bars[2].1.x, vec![5.0, 105.0]);
        let labels: Vec<_> = recorder.legends[0]
            .1
            .iter()
            .map(|entry| match entry {
                LegendEntry::Patch { label, .. } => label.as_str(),
                LegendEntry::Line { label, .. } => label.as_str(),
            })
            .collect();
        assert_eq!(labels, vec!["MESI", "WoSI", "Local DRAM", "Remote DRAM"]);
    }
}
