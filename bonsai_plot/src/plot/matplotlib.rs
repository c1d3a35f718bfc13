use crate::plot::axes::Axes;
use crate::plot::figure::Figure;
use crate::plot::pyplot::PyPlot;
use crate::{pydict, pytry};
use bonsai_eval::chart::{
    AxisSpec, Backend, BarSpec, FigureStyle, Fill, Layout, LegendEntry,
    LegendSpec, LineSpec, Output, Style,
};
use color_eyre::eyre::{self, WrapErr};
use color_eyre::Report;
use pyo3::prelude::*;
use pyo3::types::PyDict;
use std::path::Path;
use tracing::{debug, info};

/// Draws charts with matplotlib.
pub struct Matplotlib<'p> {
    py: Python<'p>,
    plt: PyPlot<'p>,
    style: FigureStyle,
    figure: Option<(Figure<'p>, Vec<Axes<'p>>)>,
}

impl<'p> Matplotlib<'p> {
    pub fn new(py: Python<'p>) -> Result<Self, Report> {
        let plt = pytry!(py, PyPlot::new(py));
        Ok(Self {
            py,
            plt,
            style: FigureStyle::default(),
            figure: None,
        })
    }

    fn axes(&self, panel: usize) -> Result<&Axes<'p>, Report> {
        let (_, axes) = match &self.figure {
            Some(figure) => figure,
            None => eyre::bail!("no figure was started"),
        };
        axes.get(panel)
            .ok_or_else(|| eyre::eyre!("figure has no panel {}", panel))
    }

    fn style_kwargs(&self, style: &Style) -> Result<&'p PyDict, Report> {
        let py = self.py;
        let kwargs = pytry!(
            py,
            pydict!(
                py,
                ("marker", style.marker.symbol()),
                ("markersize", style.marker_size),
                ("linestyle", style.line_style.symbol()),
                ("linewidth", style.line_width),
            )
        );
        if style.fill == Fill::Open {
            pytry!(py, kwargs.set_item("markerfacecolor", "none"));
        }
        if let Some(color) = &style.color {
            pytry!(py, kwargs.set_item("color", color));
        }
        Ok(kwargs)
    }

    fn handle(&self, entry: &LegendEntry) -> Result<PyObject, Report> {
        let py = self.py;
        let handle = match entry {
            LegendEntry::Line { label, style } => {
                let kwargs = self.style_kwargs(style)?;
                pytry!(py, kwargs.set_item("label", label));
                pytry!(py, self.plt.line2d(Some(kwargs)))
            }
            LegendEntry::Patch {
                label,
                color,
                hatch,
            } => {
                let kwargs = pytry!(
                    py,
                    pydict!(py, ("label", label), ("edgecolor", "black"))
                );
                if let Some(color) = color {
                    pytry!(py, kwargs.set_item("facecolor", color));
                }
                if let Some(hatch) = hatch {
                    pytry!(py, kwargs.set_item("hatch", hatch));
                }
                pytry!(py, self.plt.patch(Some(kwargs)))
            }
        };
        Ok(PyObject::from(handle))
    }
}

impl Backend for Matplotlib<'_> {
    fn start(
        &mut self,
        layout: Layout,
        style: &FigureStyle,
    ) -> Result<(), Report> {
        let py = self.py;
        if let Some(family) = &style.font_family {
            pytry!(py, self.plt.rc_param("font.family", family));
        }

        let kwargs = pytry!(py, pydict!(py, ("sharex", true)));
        if let Layout::SharedX { height_ratios } = layout {
            let ratios = height_ratios.to_vec();
            let gridspec = pytry!(py, pydict!(py, ("height_ratios", ratios)));
            pytry!(py, kwargs.set_item("gridspec_kw", gridspec));
        }
        let (fig, axes) =
            pytry!(py, self.plt.subplots(layout.panels(), Some(kwargs)));
        pytry!(py, fig.set_size_inches(style.width, style.height));

        self.style = style.clone();
        self.figure = Some((fig, axes));
        Ok(())
    }

    fn line(&mut self, panel: usize, line: LineSpec) -> Result<(), Report> {
        let py = self.py;
        let kwargs = self.style_kwargs(&line.style)?;
        if let Some(label) = &line.label {
            pytry!(py, kwargs.set_item("label", label));
        }
        let ax = self.axes(panel)?;
        pytry!(py, ax.plot(line.x, line.y, Some(kwargs)));
        Ok(())
    }

    fn bar(&mut self, panel: usize, bar: BarSpec) -> Result<(), Report> {
        let py = self.py;
        let kwargs = pytry!(
            py,
            pydict!(
                py,
                ("width", bar.width),
                ("edgecolor", "black"),
                ("linewidth", 1),
            )
        );
        if let Some(bottoms) = bar.bottoms {
            pytry!(py, kwargs.set_item("bottom", bottoms));
        }
        if let Some(color) = &bar.style.color {
            pytry!(py, kwargs.set_item("color", color));
        }
        if let Some(hatch) = &bar.style.hatch {
            pytry!(py, kwargs.set_item("hatch", hatch));
        }
        if let Some(label) = &bar.label {
            pytry!(py, kwargs.set_item("label", label));
        }
        let ax = self.axes(panel)?;
        pytry!(py, ax.bar(bar.x, bar.heights, Some(kwargs)));
        Ok(())
    }

    fn axis(&mut self, panel: usize, axis: &AxisSpec) -> Result<(), Report> {
        let py = self.py;
        let ax = self.axes(panel)?;
        let labels =
            pytry!(py, pydict!(py, ("fontsize", self.style.label_size)));

        if !axis.ticks.is_empty() {
            pytry!(py, ax.set_xticks(axis.ticks.clone()));
        }
        if !axis.tick_labels.is_empty() {
            let kwargs =
                pytry!(py, pydict!(py, ("fontsize", self.style.tick_size)));
            let tick_labels = axis.tick_labels.clone();
            pytry!(py, ax.set_xticklabels(tick_labels, Some(kwargs)));
        }
        if let Some(yticks) = &axis.yticks {
            pytry!(py, ax.set_yticks(yticks.clone()));
        }
        if let Some(x_label) = &axis.x_label {
            pytry!(py, ax.set_xlabel(x_label, Some(labels)));
        }
        if let Some(y_label) = &axis.y_label {
            pytry!(py, ax.set_ylabel(y_label, Some(labels)));
        }

        let kwargs =
            pytry!(py, pydict!(py, ("labelsize", self.style.tick_size)));
        pytry!(py, ax.tick_params(Some(kwargs)));
        if let Some(rotation) = axis.xtick_rotation {
            let kwargs = pytry!(
                py,
                pydict!(py, ("axis", "x"), ("labelrotation", rotation))
            );
            pytry!(py, ax.tick_params(Some(kwargs)));
        }
        Ok(())
    }

    fn legend(
        &mut self,
        panel: usize,
        legend: &LegendSpec,
        entries: &[LegendEntry],
    ) -> Result<(), Report> {
        let py = self.py;
        let handles = entries
            .iter()
            .map(|entry| self.handle(entry))
            .collect::<Result<Vec<_>, _>>()?;

        let prop = pytry!(py, pydict!(py, ("size", self.style.legend_size)));
        if let Some(family) = &self.style.font_family {
            pytry!(py, prop.set_item("family", family));
        }
        let kwargs = pytry!(
            py,
            pydict!(
                py,
                ("handles", handles),
                ("loc", legend.loc.as_str()),
                ("ncol", legend.ncol),
                ("frameon", legend.frameon),
                ("prop", prop),
            )
        );
        if legend.expand {
            pytry!(py, kwargs.set_item("mode", "expand"));
            pytry!(py, kwargs.set_item("handletextpad", 0.2));
            pytry!(py, kwargs.set_item("columnspacing", 0.5));
        }
        let ax = self.axes(panel)?;
        pytry!(py, ax.legend(Some(kwargs)));
        Ok(())
    }

    fn finish(&mut self, output: &Output) -> Result<(), Report> {
        let py = self.py;
        let (fig, _) = match self.figure.take() {
            Some(figure) => figure,
            None => eyre::bail!("no figure was started"),
        };
        if self.style.tight_layout {
            pytry!(py, fig.tight_layout());
        }
        if let Some(hspace) = self.style.hspace {
            let kwargs = pytry!(py, pydict!(py, ("hspace", hspace)));
            pytry!(py, fig.subplots_adjust(Some(kwargs)));
        }

        match output {
            Output::Show => {
                debug!("showing figure");
                pytry!(py, self.plt.show());
            }
            Output::File { path, format, dpi } => {
                if let Some(parent) = Path::new(path).parent() {
                    std::fs::create_dir_all(parent).wrap_err_with(|| {
                        format!("create directory {}", parent.display())
                    })?;
                }
                let kwargs = pytry!(
                    py,
                    pydict!(
                        py,
                        ("format", format.as_str()),
                        ("dpi", *dpi),
                        ("bbox_inches", "tight"),
                    )
                );
                pytry!(py, self.plt.savefig(path, Some(kwargs)));
                info!("saved {}", path);
            }
        }
        pytry!(py, self.plt.close(fig));
        Ok(())
    }
}
