//! Integration tests for grouped mappings loaded from a configuration file

use camino::Utf8PathBuf;
use metric_mapper::config::CheckConfig;
use metric_mapper::dimensions::Labels;
use metric_mapper::engine::{InstanceMapping, MetricMapper, PushOptions, PushOutcome};
use metric_mapper::metrics::{MeasurementBuffer, MetricKind};

const FEDERATE_YAML: &str = "
init_config: {}
instances:
  - name: Prometheus
    url: file://prometheus_metrics_t1
    match_labels:
      job: [kubernetes-cluster, test]
    mapping:
      dimensions:
        resource: resource
        kubernetes.container_name: kubernetes_container_name
        kubernetes.namespace: io_kubernetes_pod_namespace
        kubernetes.pod_name: kubernetes_pod_name
        hostname: kubernetes_io_hostname
      groups:
        dns.bind:
          gauges: ['bind_(up)']
          rates: ['bind_(incoming_queries)_total', 'bind_(responses)_total']
          dimensions:
            dns.bind_result: result
            dns.bind_type: type
        datapath:
          gauges: ['datapath_(.*_status)']
          dimensions:
            status: status
            instance_port:
              regex: '.*:([0-9]+)'
              source_key: instance
            instance_host:
              regex: '(.*):[0-9]+'
              source_key: instance
        kubernetes:
          gauges: ['(container_start_time_sec)onds', 'container_memory_usage_bytes']
          rates: ['(container_cpu_usage_sec)onds_total', '(container_network_.*_packages)_total']
          dimensions:
            kubernetes.cpu:
              source_key: cpu
              regex: 'cpu(.*)'
            kubernetes.zone: zone
            kubernetes.cgroup.path: id
";

fn load() -> (MetricMapper, InstanceMapping) {
    let tmp = tempfile::tempdir().expect("Could not create temp dir");
    let path = Utf8PathBuf::try_from(tmp.path().join("prometheus.yaml")).expect("Temp path is not UTF-8");
    std::fs::write(&path, FEDERATE_YAML).expect("Could not write config");

    let config = CheckConfig::load(&path).expect("Could not load config");
    let mapper = MetricMapper::new(&config.init_config);
    let state = mapper
        .configure(config.instance("Prometheus").expect("Instance is missing"))
        .expect("Could not configure instance");
    (mapper, state)
}

fn labels(pairs: &[(&str, &str)]) -> Labels {
    pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
}

#[test]
fn test_groups_prefix_metric_names() {
    let (mapper, mut state) = load();
    let mut sink = MeasurementBuffer::new();
    let hostname = labels(&[("kubernetes_io_hostname", "minion2")]);

    for raw in [
        "datapath_nslookup_common_status",
        "datapath_nslookup_kvm_instance_status",
        "container_start_time_seconds",
        "container_memory_usage_bytes",
        "bind_up",
        "bind_incoming_queries_total",
    ] {
        let outcome = mapper.push_metric(&mut state, &mut sink, raw, 1.0, &hostname, &PushOptions::new());
        assert_eq!(outcome, PushOutcome::Emitted, "pushing {raw}");
    }

    let emitted: Vec<_> = sink.measurements().iter().map(|m| (m.name.as_str(), m.kind)).collect();
    assert_eq!(
        emitted,
        [
            ("datapath.nslookup_common_status", MetricKind::Gauge),
            ("datapath.nslookup_kvm_instance_status", MetricKind::Gauge),
            ("kubernetes.container_start_time_sec", MetricKind::Gauge),
            ("kubernetes.container_memory_usage_bytes", MetricKind::Gauge),
            ("dns.bind.up", MetricKind::Gauge),
            ("dns.bind.incoming_queries", MetricKind::Rate),
        ]
    );
    assert!(sink.measurements().iter().all(|m| m.dimensions["hostname"] == "minion2"));
}

#[test]
fn test_group_rules_derive_several_dimensions_from_one_label() {
    let (mapper, mut state) = load();
    let mut sink = MeasurementBuffer::new();

    let _ = mapper.push_metric(
        &mut state,
        &mut sink,
        "datapath_dns_status",
        0.0,
        &labels(&[("instance", "10.0.0.7:9102"), ("status", "ok")]),
        &PushOptions::new(),
    );

    let dimensions = &sink.measurements()[0].dimensions;
    assert_eq!(dimensions["instance_port"], "9102");
    assert_eq!(dimensions["instance_host"], "10.0.0.7");
    assert_eq!(dimensions["status"], "ok");
}

#[test]
fn test_group_rule_filters_measurement() {
    let (mapper, mut state) = load();
    let mut sink = MeasurementBuffer::new();

    let per_cpu = mapper.push_metric(
        &mut state,
        &mut sink,
        "container_cpu_usage_seconds_total",
        3.5,
        &labels(&[("cpu", "cpu01"), ("zone", "eu-de-1a")]),
        &PushOptions::new(),
    );
    let total = mapper.push_metric(
        &mut state,
        &mut sink,
        "container_cpu_usage_seconds_total",
        7.0,
        &labels(&[("cpu", "total")]),
        &PushOptions::new(),
    );

    assert_eq!(per_cpu, PushOutcome::Emitted);
    assert_eq!(total, PushOutcome::Filtered);
    assert_eq!(sink.len(), 1);

    let measurement = &sink.measurements()[0];
    assert_eq!(measurement.name, "kubernetes.container_cpu_usage_sec");
    assert_eq!(measurement.kind, MetricKind::Rate);
    assert_eq!(measurement.dimensions["kubernetes.cpu"], "01");
    assert_eq!(measurement.dimensions["kubernetes.zone"], "eu-de-1a");
}

#[test]
fn test_group_resolution_is_cached() {
    let (mapper, mut state) = load();
    let mut sink = MeasurementBuffer::new();

    for _ in 0..3 {
        let _ = mapper.push_metric(&mut state, &mut sink, "bind_up", 1.0, &Labels::new(), &PushOptions::new());
    }

    assert_eq!(state.stats().group_misses, 1);
    assert_eq!(state.stats().group_hits, 2);
    assert_eq!(state.resolve_group("bind_up"), Some("dns.bind"));
}

#[test]
fn test_configured_patterns_for_upstream_filter() {
    let (_, state) = load();

    let patterns = state.configured_metric_patterns();
    assert_eq!(patterns.len(), 8);
    assert_eq!(patterns[0], "bind_(up)");
    assert!(state.name_filter().contains("|datapath_(.*_status)|"));
    assert_eq!(state.group_names().collect::<Vec<_>>(), ["dns.bind", "datapath", "kubernetes"]);
}

#[test]
fn test_metrics_outside_all_groups_are_unmapped() {
    let (mapper, mut state) = load();
    let mut sink = MeasurementBuffer::new();

    let outcome = mapper.push_metric(&mut state, &mut sink, "process_cpu_seconds_total", 1.0, &Labels::new(), &PushOptions::new());

    assert_eq!(outcome, PushOutcome::Unmapped);
    assert!(!state.is_enabled_metric("process_cpu_seconds_total", None));
    assert!(sink.is_empty());
}
